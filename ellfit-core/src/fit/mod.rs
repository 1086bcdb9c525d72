//! Constrained least-squares fit of an origin-centered ellipse.

pub mod config;
pub mod solver;

use log::{debug, warn};
use nalgebra::Vector3;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{
    ellipses::quadratic::QuadraticFormEllipse,
    error::FitError,
    math::complex::Complex,
    r2::R2,
};

pub use config::FitConfig;
pub use solver::SolveStatus;
use solver::{constraint, BarrierSolver};

/// Points whose spread off their principal line is below this fraction of the point-set extent are
/// considered collinear.
pub const COLLINEAR_TOL: f64 = 1e-12;

/// Result of [`fit`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fit {
    pub ellipse: QuadraticFormEllipse,
    /// Solver variables `[a, b, c]` of `a·x² + 2b·x·y + c·y² = 1`; the ellipse's `B` is `2b`.
    pub coeffs: [f64; 3],
    pub status: SolveStatus,
    pub iterations: usize,
    /// Sum of squared algebraic residuals at the solution.
    pub residual: f64,
}

impl Fit {
    pub fn converged(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

/// Reject inputs for which the fit is not well-posed: fewer than 3 points, non-finite coordinates,
/// or all points on one line.
pub fn validate(points: &[R2<f64>]) -> Result<(), FitError> {
    if points.len() < 3 {
        return Err(FitError::TooFewPoints(points.len()));
    }
    if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(FitError::NonFinite { index, x: p.x, y: p.y });
    }
    let p0 = points[0];
    let far = points
        .iter()
        .map(|p| *p - p0)
        .max_by_key(|d| OrderedFloat(d.norm2()))
        .unwrap_or_default();
    let extent = far.norm();
    if extent == 0. {
        return Err(FitError::Collinear(points.len()));
    }
    let spread = points
        .iter()
        .map(|p| far.cross(&(*p - p0)).abs() / extent)
        .fold(0., f64::max);
    if spread <= COLLINEAR_TOL * extent {
        return Err(FitError::Collinear(points.len()));
    }
    Ok(())
}

/// Least-squares circle `s·(x² + y²) = 1`, i.e. `s = Σr² / Σr⁴`.
fn circle_guess(points: &[R2<f64>]) -> Vector3<f64> {
    let (r2, r4) = points.iter().fold((0., 0.), |(r2, r4), p| {
        let n = p.norm2();
        (r2 + n, r4 + n * n)
    });
    let s = r2 / r4;
    Vector3::new(s, 0., s)
}

fn initial_point(points: &[R2<f64>], config: &FitConfig) -> Vector3<f64> {
    match config.initial_guess {
        Some(guess) => {
            let x = Vector3::from(guess);
            let g = constraint(x.as_slice());
            if x.iter().all(|v| v.is_finite()) && g > 0. {
                x
            } else {
                warn!("initial guess {:?} is not strictly inside a·c > b² ({}), starting from the least-squares circle", guess, g);
                circle_guess(points)
            }
        }
        None => circle_guess(points),
    }
}

/// Fit `a·x² + 2b·x·y + c·y² = 1` to `points`, minimizing the summed squared algebraic residuals
/// subject to `a·c ≥ b²`.
///
/// A solve that ends without reaching [`SolveStatus::Optimal`] is logged at `warn` and its last
/// iterate is still returned; check [`Fit::status`] to tell the two apart.
pub fn fit(points: &[R2<f64>], config: &FitConfig) -> Result<Fit, FitError> {
    validate(points)?;
    let x0 = initial_point(points, config);
    let solution = BarrierSolver::new(points, config).solve(x0);
    let [a, b, c] = [solution.x[0], solution.x[1], solution.x[2]];
    if solution.status != SolveStatus::Optimal {
        warn!(
            "ellipse fit ended with status {:?} after {} iterations (residual {:e}); using last iterate [{}, {}, {}]",
            solution.status, solution.iterations, solution.objective, a, b, c,
        );
    }
    let ellipse = QuadraticFormEllipse::new(a, 2. * b, c);
    debug!("fit {} points: {} ({:?}, {} iterations)", points.len(), ellipse, solution.status, solution.iterations);
    Ok(Fit {
        ellipse,
        coeffs: [a, b, c],
        status: solution.status,
        iterations: solution.iterations,
        residual: solution.objective,
    })
}

/// [`fit`] for points given as complex numbers (`re` = x, `im` = y).
pub fn fit_complex(points: &[Complex<f64>], config: &FitConfig) -> Result<Fit, FitError> {
    let points: Vec<R2<f64>> = points.iter().map(|z| R2::from(*z)).collect();
    fit(&points, config)
}
