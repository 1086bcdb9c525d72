/// Entries smaller than this, relative to the largest magnitude, are treated as singular.
pub const DEFAULT_PINV_TOL: f64 = 1e-10;

/// Elementwise pseudoinverse of a diagonal matrix stored as a vector.
///
/// Values are normalized by the largest magnitude `m` before taking reciprocals; any reciprocal
/// larger than `1/tol` (i.e. an entry within `tol·m` of zero, including exact zeros) maps to `0`
/// instead of blowing up. An all-zero input is returned unchanged.
pub fn pinv(v: &[f64], tol: f64) -> Vec<f64> {
    let m = v.iter().fold(0., |m: f64, x| m.max(x.abs()));
    if m == 0. {
        return v.to_vec();
    }
    let limit = 1. / tol;
    v.iter()
        .map(|x| {
            let r = 1. / (x / m);
            if r.abs() > limit { 0. } else { r / m }
        })
        .collect()
}

/// [`pinv`] with [`DEFAULT_PINV_TOL`]; used for the eigenvalues in ellipse conversion.
pub fn pinv_default(v: &[f64]) -> Vec<f64> {
    pinv(v, DEFAULT_PINV_TOL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_unchanged() {
        assert_eq!(pinv_default(&[0., 0., 0.]), vec![0., 0., 0.]);
        assert_eq!(pinv_default(&[-0.]), vec![-0.]);
        assert_eq!(pinv_default(&[]), Vec::<f64>::new());
    }

    #[test]
    fn reciprocals() {
        let r = pinv_default(&[2., -4., 0.5]);
        assert_relative_eq!(r[0], 0.5);
        assert_relative_eq!(r[1], -0.25);
        assert_relative_eq!(r[2], 2.);
    }

    #[test]
    fn small_entries_zeroed() {
        let r = pinv_default(&[1e6, 1., 1e-5, 0.]);
        assert_relative_eq!(r[0], 1e-6);
        assert_relative_eq!(r[1], 1.);
        // 1e-5 / 1e6 = 1e-11 < 1e-10
        assert_eq!(r[2], 0.);
        assert_eq!(r[3], 0.);
    }

    #[test]
    fn custom_tolerance() {
        let r = pinv(&[1., 1e-3], 1e-2);
        assert_relative_eq!(r[0], 1.);
        assert_eq!(r[1], 0.);
        let r = pinv(&[1., 1e-3], 1e-4);
        assert_relative_eq!(r[1], 1e3, max_relative = 1e-12);
    }
}
