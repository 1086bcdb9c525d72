#[cfg_attr(not(test), allow(unused_imports))]
#[macro_use]
extern crate approx;

pub mod ellipses;
pub mod error;
pub mod fit;
pub mod math;
pub mod r2;
pub mod rotate;
pub mod sample;

// Re-export key types for external use
pub use ellipses::parametric::ParametricFormEllipse;
pub use ellipses::quadratic::QuadraticFormEllipse;
pub use error::{EllipseError, FitError};
pub use fit::{fit, fit_complex, Fit, FitConfig, SolveStatus};
pub use math::complex::Complex;
pub use math::pinv::{pinv, pinv_default, DEFAULT_PINV_TOL};
pub use r2::R2;
pub use rotate::{rotation_mat, Orientation};
pub use sample::{sample, sample_default, DEFAULT_SAMPLES};

/// Fit `points` and convert the result straight to parametric form.
pub fn fit_parametric(points: &[R2<f64>], config: &FitConfig) -> Result<(Fit, ParametricFormEllipse), FitError> {
    let fit = fit(points, config)?;
    let parametric = fit.ellipse.to_parametric();
    Ok((fit, parametric))
}

/// Parse a log level string into LevelFilter; empty or missing means `info`.
pub fn parse_log_level(level: Option<&str>) -> Result<log::LevelFilter, log::ParseLevelError> {
    match level {
        Some("") | None => Ok(log::LevelFilter::Info),
        Some(level) => level.parse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels() {
        assert_eq!(parse_log_level(None), Ok(log::LevelFilter::Info));
        assert_eq!(parse_log_level(Some("")), Ok(log::LevelFilter::Info));
        assert_eq!(parse_log_level(Some("debug")), Ok(log::LevelFilter::Debug));
        assert_eq!(parse_log_level(Some("WARN")), Ok(log::LevelFilter::Warn));
        assert!(parse_log_level(Some("loud")).is_err());
    }
}
