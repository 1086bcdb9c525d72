pub mod complex;
pub mod pinv;

use std::f64::consts::{PI, TAU};

/// Wrap an angle into `(-π, π]`.
pub fn wrap_angle(theta: f64) -> f64 {
    let t = theta.rem_euclid(TAU);
    if t > PI { t - TAU } else { t }
}

/// Wrap an axis direction into `(-π/2, π/2]`; `θ` and `θ + π` describe the same axis.
pub fn wrap_axis_angle(theta: f64) -> f64 {
    let t = theta.rem_euclid(PI);
    if t > PI / 2. { t - PI } else { t }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use super::*;

    #[test]
    fn wrap() {
        assert_eq!(wrap_angle(0.), 0.);
        assert_relative_eq!(wrap_angle(PI), PI);
        assert_relative_eq!(wrap_angle(-PI), PI);
        assert_relative_eq!(wrap_angle(3. * FRAC_PI_2), -FRAC_PI_2);
        assert_relative_eq!(wrap_angle(-5. * FRAC_PI_4), 3. * FRAC_PI_4);
    }

    #[test]
    fn wrap_axis() {
        assert_relative_eq!(wrap_axis_angle(FRAC_PI_2), FRAC_PI_2);
        assert_relative_eq!(wrap_axis_angle(-FRAC_PI_2), FRAC_PI_2);
        assert_relative_eq!(wrap_axis_angle(3. * FRAC_PI_4), -FRAC_PI_4);
        assert_relative_eq!(wrap_axis_angle(-3. * FRAC_PI_4), FRAC_PI_4);
        assert_relative_eq!(wrap_axis_angle(PI), 0., epsilon = 1e-15);
    }
}
