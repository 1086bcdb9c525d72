use std::fmt::{Display, Formatter, self};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

/// Complex number used as a point carrier: `re` is x, `im` is y.
#[derive(
    Clone, Copy, Debug, Default, PartialEq,
    derive_more::Add,
    derive_more::Sub,
    Serialize, Deserialize, Tsify,
)]
pub struct Complex<D> {
    pub re: D,
    pub im: D,
}

impl Complex<f64> {
    pub fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }
    pub fn from_polar(r: f64, theta: f64) -> Self {
        Complex { re: r * theta.cos(), im: r * theta.sin() }
    }
}

impl<D: Display> Display for Complex<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} + {:.6}i", self.re, self.im)
    }
}

impl<D: AbsDiffEq<Epsilon = f64>> AbsDiffEq for Complex<D> {
    type Epsilon = D::Epsilon;
    fn default_epsilon() -> Self::Epsilon {
        D::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.re.abs_diff_eq(&other.re, epsilon) && self.im.abs_diff_eq(&other.im, epsilon)
    }
}

impl<D: RelativeEq<Epsilon = f64>> RelativeEq for Complex<D>
{
    fn default_max_relative() -> Self::Epsilon {
        D::default_max_relative()
    }
    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.re.relative_eq(&other.re, epsilon, max_relative) && self.im.relative_eq(&other.im, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn polar() {
        let z = Complex::from_polar(2., FRAC_PI_2);
        assert_abs_diff_eq!(z, Complex::new(0., 2.), epsilon = 1e-15);
    }
}
