//! Log-barrier interior-point solver for the origin-centered ellipse fit.
//!
//! Minimizes `f(a, b, c) = Σ (a·x² + 2b·x·y + c·y² − 1)²` subject to `a·c − b² ≥ 0` by following the
//! central path of `f − μ·ln(a·c − b²)`:
//! - each barrier round runs damped Newton steps (gradient and Hessian from `num-dual`) until the
//!   Newton decrement is below tolerance, relative to `max(|φ|, μ)` so centering keeps tightening as
//!   `μ` shrinks
//! - backtracking keeps every iterate strictly inside the constraint
//! - `μ` shrinks by [`MU_DECREASE`] per round until the duality gap bound `μ` is below tolerance

use log::{log, trace, Level};
use nalgebra::{Matrix3, Vector3};
use num_dual::{hessian, DualNum};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::r2::R2;

use super::config::FitConfig;

/// Barrier weight multiplier between rounds.
pub const MU_DECREASE: f64 = 0.1;
/// Armijo sufficient-decrease fraction.
const ARMIJO: f64 = 0.25;
/// Backtracking step shrink factor.
const BACKTRACK: f64 = 0.5;
/// Smallest step length tried before giving up on a line search.
const MIN_STEP: f64 = 1e-14;
/// A failed line search with a Newton decrement above this (relative) counts as stalled.
const STALL_DECREMENT: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Tsify, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Barrier weight driven below tolerance with every round centered.
    Optimal,
    /// Iteration cap reached first.
    MaxIterations,
    /// Line search could not make progress far from a stationary point.
    Stalled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub x: Vector3<f64>,
    pub status: SolveStatus,
    pub iterations: usize,
    pub objective: f64,
}

/// Sum of squared algebraic residuals of the points against `a·x² + 2b·x·y + c·y² = 1`.
pub fn residual<D: DualNum<f64>>(x: &[D], points: &[R2<f64>]) -> D {
    let (a, b, c) = (&x[0], &x[1], &x[2]);
    points.iter().fold(D::from(0.), |sum, p| {
        let r = a.clone() * (p.x * p.x) + b.clone() * (2. * p.x * p.y) + c.clone() * (p.y * p.y) - 1.;
        sum + r.clone() * r
    })
}

/// `a·c − b²`; nonnegative for ellipses (and circles/points), negative for hyperbolas.
pub fn constraint<D: DualNum<f64>>(x: &[D]) -> D {
    x[0].clone() * x[2].clone() - x[1].clone() * x[1].clone()
}

fn barrier<D: DualNum<f64>>(x: &[D], points: &[R2<f64>], mu: f64) -> D {
    residual(x, points) - constraint(x).ln() * mu
}

enum Centering {
    Converged,
    MaxIterations,
    Stalled,
}

/// One fit's solver session; nothing carries over between calls.
pub struct BarrierSolver<'a> {
    points: &'a [R2<f64>],
    config: &'a FitConfig,
    level: Level,
    iterations: usize,
}

impl<'a> BarrierSolver<'a> {
    pub fn new(points: &'a [R2<f64>], config: &'a FitConfig) -> Self {
        let level = if config.verbose { Level::Info } else { Level::Debug };
        BarrierSolver { points, config, level, iterations: 0 }
    }

    pub fn objective(&self, x: &Vector3<f64>) -> f64 {
        residual(x.as_slice(), self.points)
    }

    fn feasible(x: &Vector3<f64>) -> bool {
        let g = constraint(x.as_slice());
        g.is_finite() && g > 0.
    }

    fn phi(&self, x: &Vector3<f64>, mu: f64) -> f64 {
        barrier(x.as_slice(), self.points, mu)
    }

    /// `x0` must be strictly feasible.
    pub fn solve(mut self, x0: Vector3<f64>) -> Solution {
        let tol = self.config.tolerance;
        let max_iterations = self.config.max_iterations();
        let mut x = x0;
        let f0 = self.objective(&x);
        let mut mu = (f0 / 10.).max(tol * 10.);
        log!(self.level, "barrier solve: {} points, x0 {:?}, f0 {:e}, μ0 {:e}", self.points.len(), x.as_slice(), f0, mu);
        let status = loop {
            match self.center(&mut x, mu, max_iterations) {
                Centering::Converged => {},
                Centering::MaxIterations => break SolveStatus::MaxIterations,
                Centering::Stalled => break SolveStatus::Stalled,
            }
            let f = self.objective(&x);
            log!(self.level, "μ {:e}: x {:?}, f {:e}, a·c−b² {:e}, {} iterations", mu, x.as_slice(), f, constraint(x.as_slice()), self.iterations);
            if mu <= tol * f.max(1.) {
                break SolveStatus::Optimal;
            }
            mu *= MU_DECREASE;
        };
        let objective = self.objective(&x);
        Solution { x, status, iterations: self.iterations, objective }
    }

    /// Damped Newton on the barrier objective for a fixed `mu`.
    fn center(&mut self, x: &mut Vector3<f64>, mu: f64, max_iterations: usize) -> Centering {
        let tol = self.config.tolerance;
        loop {
            if self.iterations >= max_iterations {
                return Centering::MaxIterations;
            }
            let points = self.points;
            let (phi, grad, hess) = hessian(|v| barrier(v.as_slice(), points, mu), *x);
            let step = newton_direction(&grad, &hess);
            let slope = grad.dot(&step);
            let decrement = -slope;
            let scale = phi.abs().max(mu);
            if decrement / 2. <= tol * scale {
                return Centering::Converged;
            }
            self.iterations += 1;
            match self.line_search(x, &step, phi, slope, mu) {
                Some(t) => {
                    trace!("  step {}: φ {:e}, λ² {:e}, t {}", self.iterations, phi, decrement, t);
                }
                None => {
                    return if decrement / 2. > STALL_DECREMENT * scale {
                        Centering::Stalled
                    } else {
                        trace!("  line search exhausted at λ² {:e}, treating as centered", decrement);
                        Centering::Converged
                    };
                }
            }
        }
    }

    /// Backtracking along `step` from `x`; updates `x` and returns the accepted step length.
    fn line_search(&self, x: &mut Vector3<f64>, step: &Vector3<f64>, phi: f64, slope: f64, mu: f64) -> Option<f64> {
        let mut t = 1.;
        while t >= MIN_STEP {
            let next = *x + step * t;
            if Self::feasible(&next) {
                let phi_next = self.phi(&next, mu);
                if phi_next.is_finite() && phi_next <= phi + ARMIJO * t * slope {
                    *x = next;
                    return Some(t);
                }
            }
            t *= BACKTRACK;
        }
        None
    }
}

/// Newton step `−H⁻¹·g`, falling back to LU for indefinite or singular Hessians and to steepest
/// descent when neither yields a descent direction.
fn newton_direction(grad: &Vector3<f64>, hess: &Matrix3<f64>) -> Vector3<f64> {
    let rhs = -grad;
    if let Some(chol) = (*hess).cholesky() {
        return chol.solve(&rhs);
    }
    if let Some(step) = (*hess).lu().solve(&rhs) {
        if step.dot(grad) < 0. {
            return step;
        }
    }
    rhs
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::*;
    use test_log::test;

    fn ellipse_points(rx: f64, ry: f64, n: usize) -> Vec<R2<f64>> {
        (0..n)
            .map(|i| {
                let t = TAU * i as f64 / n as f64;
                R2 { x: rx * t.cos(), y: ry * t.sin() }
            })
            .collect()
    }

    #[test]
    fn residual_zero_on_boundary() {
        let points = ellipse_points(2., 1., 12);
        assert_abs_diff_eq!(residual(&[0.25, 0., 1.], &points), 0., epsilon = 1e-20);
        assert!(residual(&[1., 0., 1.], &points) > 1.);
    }

    #[test]
    fn constraint_sign() {
        assert_eq!(constraint(&[1., 0., 1.]), 1.);
        assert_eq!(constraint(&[1., 2., 1.]), -3.);
    }

    #[test]
    fn derivatives() {
        let points = vec![R2 { x: 1., y: 0. }, R2 { x: 0., y: 2. }, R2 { x: 1., y: 1. }];
        let x = Vector3::new(1., 0.1, 0.5);
        let (f, grad, hess) = hessian(|v| residual(v.as_slice(), &points), x);
        assert_relative_eq!(f, residual(x.as_slice(), &points));
        // Rows of the design matrix: (x², 2xy, y²)
        let rows = [Vector3::new(1., 0., 0.), Vector3::new(0., 0., 4.), Vector3::new(1., 2., 1.)];
        let mut expected_grad = Vector3::zeros();
        let mut expected_hess = Matrix3::zeros();
        for row in rows {
            let r = row.dot(&x) - 1.;
            expected_grad += row * (2. * r);
            expected_hess += row * row.transpose() * 2.;
        }
        assert_relative_eq!(grad, expected_grad, epsilon = 1e-12);
        assert_relative_eq!(hess, expected_hess, epsilon = 1e-12);
    }

    #[test]
    fn newton_direction_fallbacks() {
        let grad = Vector3::new(1., -2., 0.5);
        let step = newton_direction(&grad, &Matrix3::identity());
        assert_eq!(step, -grad);
        let step = newton_direction(&grad, &Matrix3::from_diagonal(&Vector3::new(2., 4., 1.)));
        assert_relative_eq!(step, Vector3::new(-0.5, 0.5, -0.5));
        // Singular Hessian: steepest descent
        let step = newton_direction(&grad, &Matrix3::zeros());
        assert_eq!(step, -grad);
    }

    #[test]
    fn solves_axis_aligned() {
        let points = ellipse_points(2., 1., 40);
        let config = FitConfig::default();
        let solution = BarrierSolver::new(&points, &config).solve(Vector3::new(1., 0., 1.));
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_relative_eq!(solution.x, Vector3::new(0.25, 0., 1.), epsilon = 1e-8);
        assert!(solution.objective < 1e-12, "{}", solution.objective);
    }

    #[test]
    fn later_rounds_keep_stepping() {
        // Once φ drops below 1, each barrier round must still move the iterate toward the smaller-μ
        // center; the final error tracks the last μ (≈ tolerance), not an early one
        let points = ellipse_points(2., 1., 40);
        let config = FitConfig::default();
        let solution = BarrierSolver::new(&points, &config).solve(Vector3::new(1., 0., 1.));
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_abs_diff_eq!(solution.x, Vector3::new(0.25, 0., 1.), epsilon = 1e-11);

        let coarse = FitConfig { tolerance: 1e-6, ..FitConfig::default() };
        let coarse = BarrierSolver::new(&points, &coarse).solve(Vector3::new(1., 0., 1.));
        assert_eq!(coarse.status, SolveStatus::Optimal);
        assert!(solution.iterations > coarse.iterations, "{} vs {}", solution.iterations, coarse.iterations);
    }

    #[test]
    fn iteration_cap() {
        let points = ellipse_points(2., 1., 40);
        let config = FitConfig { max_iterations: Some(1), ..FitConfig::default() };
        let solution = BarrierSolver::new(&points, &config).solve(Vector3::new(1., 0., 1.));
        assert_eq!(solution.status, SolveStatus::MaxIterations);
        assert_eq!(solution.iterations, 1);
        assert!(BarrierSolver::feasible(&solution.x));
    }
}
