#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("Expected at least 3 points, found {0}")]
    TooFewPoints(usize),

    #[error("Point {index} is not finite: ({x}, {y})")]
    NonFinite { index: usize, x: f64, y: f64 },

    #[error("All {0} points are collinear")]
    Collinear(usize),
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EllipseError {
    #[error("Degenerate quadratic form {a}x² + {b}xy + {c}y² = 1 has no real semi-axes")]
    Degenerate { a: f64, b: f64, c: f64 },

    #[error("Quadratic form coefficients must be finite: ({a}, {b}, {c})")]
    NonFinite { a: f64, b: f64, c: f64 },

    #[error("Only origin-centered ellipses have a quadratic form, center is ({x}, {y})")]
    OffCenter { x: f64, y: f64 },
}
