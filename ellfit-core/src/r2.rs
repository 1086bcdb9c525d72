use std::{ops::{Mul, Div}, fmt::{Display, Formatter, self}};
use approx::{AbsDiffEq, RelativeEq};

use derive_more::{Add, Sub, Neg, From};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::math::complex::Complex;

/// Point (or vector) in the plane.
#[derive(Debug, Copy, Clone, Default, PartialEq, Add, Sub, Neg, From, Serialize, Deserialize, Tsify)]
pub struct R2<D> {
    pub x: D,
    pub y: D,
}

impl<D: Display> Display for R2<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

impl R2<f64> {
    pub fn origin() -> Self {
        R2 { x: 0., y: 0. }
    }
    pub fn norm2(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }
    pub fn norm(&self) -> f64 {
        self.norm2().sqrt()
    }
    /// z-component of the 3D cross product `self × o`.
    pub fn cross(&self, o: &R2<f64>) -> f64 {
        self.x * o.y - self.y * o.x
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Complex<f64>> for R2<f64> {
    fn from(z: Complex<f64>) -> Self {
        R2 { x: z.re, y: z.im }
    }
}

impl From<R2<f64>> for Complex<f64> {
    fn from(p: R2<f64>) -> Self {
        Complex { re: p.x, im: p.y }
    }
}

impl<D: Mul<D, Output = D> + Clone> Mul<D> for R2<D> {
    type Output = Self;
    fn mul(self, rhs: D) -> Self::Output {
        R2 {
            x: self.x * rhs.clone(),
            y: self.y * rhs,
        }
    }
}

impl<D: Div<D, Output = D> + Clone> Div<D> for R2<D> {
    type Output = Self;
    fn div(self, rhs: D) -> Self::Output {
        R2 {
            x: self.x / rhs.clone(),
            y: self.y / rhs,
        }
    }
}

impl<D: AbsDiffEq<Epsilon = f64>> AbsDiffEq for R2<D> {
    type Epsilon = f64;
    fn default_epsilon() -> Self::Epsilon {
        D::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl<D: RelativeEq<Epsilon = f64>> RelativeEq for R2<D> {
    fn default_max_relative() -> Self::Epsilon {
        D::default_max_relative()
    }
    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative) && self.y.relative_eq(&other.y, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops() {
        let p = R2 { x: 1., y: 2. };
        let q = R2 { x: 3., y: -1. };
        assert_eq!(p + q, R2 { x: 4., y: 1. });
        assert_eq!(p - q, R2 { x: -2., y: 3. });
        assert_eq!(-p, R2 { x: -1., y: -2. });
        assert_eq!(p * 2., R2 { x: 2., y: 4. });
        assert_eq!(q / 2., R2 { x: 1.5, y: -0.5 });
        assert_eq!(p.cross(&q), -7.);
        assert_eq!(R2::from((3., 4.)).norm(), 5.);
    }

    #[test]
    fn complex_roundtrip() {
        let z = Complex { re: 2., im: -1. };
        let p: R2<f64> = z.into();
        assert_eq!(p, R2 { x: 2., y: -1. });
        assert_eq!(Complex::from(p), z);
    }
}
