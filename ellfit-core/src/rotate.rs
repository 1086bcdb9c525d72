use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::r2::R2;

/// Rotation handedness.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Ccw,
    Cw,
}

/// 2×2 matrix rotating by `theta` radians in the given direction.
pub fn rotation_mat(theta: f64, orientation: Orientation) -> Matrix2<f64> {
    let (sin, cos) = theta.sin_cos();
    match orientation {
        Orientation::Ccw => Matrix2::new(cos, -sin, sin, cos),
        Orientation::Cw => Matrix2::new(cos, sin, -sin, cos),
    }
}

pub trait Rotate<D> {
    fn rotate(&self, theta: &D) -> Self;
}

impl Rotate<f64> for R2<f64> {
    /// Counter-clockwise rotation about the origin.
    fn rotate(&self, theta: &f64) -> Self {
        let v = rotation_mat(*theta, Orientation::Ccw) * Vector2::new(self.x, self.y);
        R2 { x: v.x, y: v.y }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    #[test]
    fn identity() {
        assert_eq!(rotation_mat(0., Orientation::Ccw), Matrix2::identity());
        assert_eq!(rotation_mat(0., Orientation::Cw), Matrix2::identity());
    }

    #[test]
    fn handedness() {
        for theta in [0.1, 1., -2.5, PI, 7.] {
            assert_eq!(rotation_mat(theta, Orientation::Ccw), rotation_mat(-theta, Orientation::Cw));
            let m = rotation_mat(theta, Orientation::Ccw) * rotation_mat(theta, Orientation::Cw);
            assert_relative_eq!(m, Matrix2::identity(), epsilon = 1e-15);
        }
    }

    #[test]
    fn rotate_point() {
        let p = R2 { x: 1., y: 0. }.rotate(&FRAC_PI_2);
        assert_abs_diff_eq!(p, R2 { x: 0., y: 1. }, epsilon = 1e-15);
        let p = R2 { x: 1., y: 1. }.rotate(&PI);
        assert_abs_diff_eq!(p, R2 { x: -1., y: -1. }, epsilon = 1e-15);
    }
}
