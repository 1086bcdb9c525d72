use std::{f64::consts::FRAC_PI_2, fmt::Display};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Deserializer, Serialize};
use tsify::Tsify;

use crate::{
    error::EllipseError,
    math::{wrap_angle, wrap_axis_angle},
    r2::R2,
    rotate::Rotate,
};

use super::quadratic::QuadraticFormEllipse;

/// Ellipse given by center, semi-axis lengths (major first) and the counter-clockwise angle of the
/// major axis from the x-axis, in `(-π, π]`.
///
/// Deserializing goes through [`ParametricFormEllipse::new`], so decoded values are normalized the
/// same way as constructed ones.
#[derive(Debug, Clone, PartialEq, Serialize, Tsify)]
pub struct ParametricFormEllipse {
    pub semiaxis_lengths: [f64; 2],
    pub center: R2<f64>,
    pub ccw_angle: f64,
}

/// Wire shape accepted when deserializing.
#[derive(Deserialize)]
struct Fields {
    semiaxis_lengths: [f64; 2],
    #[serde(default)]
    center: R2<f64>,
    ccw_angle: f64,
}

impl<'de> Deserialize<'de> for ParametricFormEllipse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Fields { semiaxis_lengths, center, ccw_angle } = Fields::deserialize(deserializer)?;
        Ok(ParametricFormEllipse::new(semiaxis_lengths, center, ccw_angle))
    }
}

impl ParametricFormEllipse {
    /// Lengths are reordered major-first (turning the angle by π/2 if they were swapped), and the angle
    /// is wrapped into `(-π, π]`.
    pub fn new(semiaxis_lengths: [f64; 2], center: R2<f64>, ccw_angle: f64) -> Self {
        let [r0, r1] = semiaxis_lengths;
        let (semiaxis_lengths, ccw_angle) = if r1 > r0 {
            ([r1, r0], ccw_angle + FRAC_PI_2)
        } else {
            ([r0, r1], ccw_angle)
        };
        ParametricFormEllipse { semiaxis_lengths, center, ccw_angle: wrap_angle(ccw_angle) }
    }

    pub fn centered(semiaxis_lengths: [f64; 2], ccw_angle: f64) -> Self {
        Self::new(semiaxis_lengths, R2::origin(), ccw_angle)
    }

    /// Same ellipse with the major-axis angle in `(-π/2, π/2]`.
    pub fn canonical(&self) -> Self {
        ParametricFormEllipse { ccw_angle: wrap_axis_angle(self.ccw_angle), ..self.clone() }
    }

    /// Map a point into this ellipse's frame: translate the center to the origin, then undo the rotation.
    pub fn to_local(&self, p: &R2<f64>) -> R2<f64> {
        (*p - self.center).rotate(&-self.ccw_angle)
    }

    /// `(x/r₀)² + (y/r₁)²` in the ellipse's frame; `1` on the boundary.
    pub fn eval(&self, p: &R2<f64>) -> f64 {
        let R2 { x, y } = self.to_local(p);
        let [r0, r1] = self.semiaxis_lengths;
        (x / r0).powi(2) + (y / r1).powi(2)
    }

    /// Implicit form of this ellipse; only defined when centered at the origin.
    pub fn to_quadratic(&self) -> Result<QuadraticFormEllipse, EllipseError> {
        let R2 { x, y } = self.center;
        if x != 0. || y != 0. {
            return Err(EllipseError::OffCenter { x, y });
        }
        let [r0, r1] = self.semiaxis_lengths;
        let (p, q) = (1. / (r0 * r0), 1. / (r1 * r1));
        let (sin, cos) = self.ccw_angle.sin_cos();
        QuadraticFormEllipse::try_new(
            p * cos * cos + q * sin * sin,
            2. * (p - q) * sin * cos,
            p * sin * sin + q * cos * cos,
        )
    }
}

impl Display for ParametricFormEllipse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r0, r1] = self.semiaxis_lengths;
        write!(f, "{{ c: {}, r: ({:.3}, {:.3}) {:.1}° }}", self.center, r0, r1, self.ccw_angle.to_degrees())
    }
}

impl AbsDiffEq for ParametricFormEllipse {
    type Epsilon = f64;
    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.semiaxis_lengths[0].abs_diff_eq(&other.semiaxis_lengths[0], epsilon)
        && self.semiaxis_lengths[1].abs_diff_eq(&other.semiaxis_lengths[1], epsilon)
        && self.center.abs_diff_eq(&other.center, epsilon)
        && self.ccw_angle.abs_diff_eq(&other.ccw_angle, epsilon)
    }
}

impl RelativeEq for ParametricFormEllipse {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }
    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.semiaxis_lengths[0].relative_eq(&other.semiaxis_lengths[0], epsilon, max_relative)
        && self.semiaxis_lengths[1].relative_eq(&other.semiaxis_lengths[1], epsilon, max_relative)
        && self.center.relative_eq(&other.center, epsilon, max_relative)
        && self.ccw_angle.relative_eq(&other.ccw_angle, epsilon, max_relative)
    }
}
