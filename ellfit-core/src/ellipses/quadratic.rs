use std::fmt::Display;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{error::EllipseError, r2::R2};

/// Below this, `sin(2θ)` is treated as zero when recovering the eigenvalue spread from `B`.
const SIN_EPS: f64 = 1e-12;

/// Origin-centered ellipse in implicit form: `A·x² + B·x·y + C·y² = 1`
///
/// Canonical parameters (`semi_axis_a` along `rotation_angle`, `semi_axis_b` perpendicular to it) are
/// derived once at construction. Quadratic forms with no real semi-axes are replaced by the unit
/// circle by [`QuadraticFormEllipse::new`]; use [`QuadraticFormEllipse::try_new`] to reject them
/// instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Coeffs")]
pub struct QuadraticFormEllipse {
    a: f64,
    b: f64,
    c: f64,
    semi_axis_a: f64,
    semi_axis_b: f64,
    rotation_angle: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    fallback: bool,
}

/// Wire shape accepted when deserializing; derived fields are always recomputed.
#[derive(Deserialize)]
struct Coeffs {
    a: f64,
    b: f64,
    c: f64,
}

impl From<Coeffs> for QuadraticFormEllipse {
    fn from(Coeffs { a, b, c }: Coeffs) -> Self {
        QuadraticFormEllipse::new(a, b, c)
    }
}

/// `A·x² + B·x·y + C·y²`
pub fn quadratic_form(a: f64, b: f64, c: f64, p: &R2<f64>) -> f64 {
    let R2 { x, y } = *p;
    a * x * x + b * x * y + c * y * y
}

/// `(semi_axis_a, semi_axis_b, rotation_angle)` for the form; a semi-axis is `0` wherever its squared
/// length comes out negative or non-finite.
fn canonical(a: f64, b: f64, c: f64) -> (f64, f64, f64) {
    let theta = if a == c && b == 0. { 0. } else { b.atan2(a - c) / 2. };
    let theta = if theta.is_nan() { 0. } else { theta };
    let sin2 = (2. * theta).sin();
    let rr = if sin2.abs() > SIN_EPS { b / sin2 } else { (a - c).hypot(b) };
    let semi_axis = |denom: f64| {
        let sqr = 1. / denom;
        if sqr.is_finite() && sqr > 0. { sqr.sqrt() } else { 0. }
    };
    (
        semi_axis((a + c + rr) / 2.),
        semi_axis((a + c - rr) / 2.),
        theta,
    )
}

impl QuadraticFormEllipse {
    /// Build from coefficients, substituting the unit circle for degenerate or non-finite forms.
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        match Self::try_new(a, b, c) {
            Ok(e) => e,
            Err(err) => {
                warn!("{}; falling back to the unit circle", err);
                QuadraticFormEllipse { fallback: true, ..Self::unit_circle() }
            }
        }
    }

    pub fn try_new(a: f64, b: f64, c: f64) -> Result<Self, EllipseError> {
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return Err(EllipseError::NonFinite { a, b, c });
        }
        let (semi_axis_a, semi_axis_b, rotation_angle) = canonical(a, b, c);
        if semi_axis_a == 0. && semi_axis_b == 0. {
            return Err(EllipseError::Degenerate { a, b, c });
        }
        Ok(QuadraticFormEllipse { a, b, c, semi_axis_a, semi_axis_b, rotation_angle, fallback: false })
    }

    pub fn unit_circle() -> Self {
        QuadraticFormEllipse {
            a: 1., b: 0., c: 1.,
            semi_axis_a: 1., semi_axis_b: 1.,
            rotation_angle: 0.,
            fallback: false,
        }
    }

    pub fn a(&self) -> f64 { self.a }
    pub fn b(&self) -> f64 { self.b }
    pub fn c(&self) -> f64 { self.c }
    pub fn coeffs(&self) -> [f64; 3] { [self.a, self.b, self.c] }

    /// Semi-axis along [`Self::rotation_angle`].
    pub fn semi_axis_a(&self) -> f64 { self.semi_axis_a }
    /// Semi-axis perpendicular to [`Self::rotation_angle`].
    pub fn semi_axis_b(&self) -> f64 { self.semi_axis_b }
    pub fn rotation_angle(&self) -> f64 { self.rotation_angle }

    /// Whether this is the unit circle substituted for a degenerate input.
    pub fn is_fallback(&self) -> bool { self.fallback }

    /// Value of the form at `p`; `1` on the boundary, `< 1` inside.
    pub fn eval(&self, p: &R2<f64>) -> f64 {
        quadratic_form(self.a, self.b, self.c, p)
    }
}

impl Display for QuadraticFormEllipse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}x² + {:.4}xy + {:.4}y² = 1", self.a, self.b, self.c)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use super::*;
    use test_log::test;

    #[test]
    fn circles() {
        for r in [0.5, 1., 3., 1e3] {
            let k = 1. / (r * r);
            let e = QuadraticFormEllipse::new(k, 0., k);
            assert!(!e.is_fallback());
            assert_relative_eq!(e.semi_axis_a(), r, max_relative = 1e-12);
            assert_relative_eq!(e.semi_axis_b(), r, max_relative = 1e-12);
            assert_eq!(e.rotation_angle(), 0.);
        }
    }

    #[test]
    fn axis_aligned() {
        let e = QuadraticFormEllipse::new(0.25, 0., 1.);
        assert_relative_eq!(e.rotation_angle(), FRAC_PI_2);
        assert_relative_eq!(e.semi_axis_a(), 1.);
        assert_relative_eq!(e.semi_axis_b(), 2.);

        let e = QuadraticFormEllipse::new(1., 0., 0.25);
        assert_eq!(e.rotation_angle(), 0.);
        assert_relative_eq!(e.semi_axis_a(), 1.);
        assert_relative_eq!(e.semi_axis_b(), 2.);
    }

    #[test]
    fn rotated() {
        // Semi-axes 2 (along π/4) and 1: A = C = (1/4 + 1)/2, B = 1/4 - 1
        let e = QuadraticFormEllipse::new(0.625, -0.75, 0.625);
        assert_relative_eq!(e.rotation_angle(), -FRAC_PI_4);
        assert_relative_eq!(e.semi_axis_a(), 1., max_relative = 1e-12);
        assert_relative_eq!(e.semi_axis_b(), 2., max_relative = 1e-12);
        let s = 2_f64.sqrt();
        assert_relative_eq!(e.eval(&R2 { x: s, y: s }), 1., max_relative = 1e-12);
        assert_relative_eq!(e.eval(&R2 { x: -s / 2., y: s / 2. }), 1., max_relative = 1e-12);
    }

    #[test]
    fn degenerate_falls_back() {
        for (a, b, c) in [(0., 0., 0.), (-1., 0., -1.), (-2., 0.5, -3.), (f64::NAN, 0., 1.)] {
            let e = QuadraticFormEllipse::new(a, b, c);
            assert!(e.is_fallback());
            assert_eq!(e.coeffs(), [1., 0., 1.]);
            assert_eq!((e.semi_axis_a(), e.semi_axis_b(), e.rotation_angle()), (1., 1., 0.));
        }
    }

    #[test]
    fn strict_construction() {
        assert_eq!(
            QuadraticFormEllipse::try_new(-1., 0., -1.),
            Err(EllipseError::Degenerate { a: -1., b: 0., c: -1. }),
        );
        assert!(matches!(
            QuadraticFormEllipse::try_new(f64::INFINITY, 0., 1.),
            Err(EllipseError::NonFinite { .. }),
        ));
        assert!(QuadraticFormEllipse::try_new(1., 0., 1.).is_ok());
    }

    #[test]
    fn hyperbola_clamps_one_axis() {
        let e = QuadraticFormEllipse::new(1., 0., -1.);
        assert!(!e.is_fallback());
        assert_relative_eq!(e.semi_axis_a(), 1.);
        assert_eq!(e.semi_axis_b(), 0.);
    }

    #[test]
    fn serde() {
        let e = QuadraticFormEllipse::new(0.25, 0., 1.);
        let json = serde_json::to_string(&e).unwrap();
        let back: QuadraticFormEllipse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
        let parsed: QuadraticFormEllipse = serde_json::from_str(r#"{"a":0,"b":0,"c":0}"#).unwrap();
        assert!(parsed.is_fallback());
    }
}
