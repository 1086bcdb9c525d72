use serde::{Deserialize, Serialize};
use tsify::Tsify;

/// Newton iterations allowed across all barrier rounds when [`FitConfig::max_iterations`] is unset.
pub const DEFAULT_MAX_ITERATIONS: usize = 500;

/// Default relative stopping tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Configuration for [`crate::fit::fit`].
#[derive(Clone, Debug, PartialEq, Tsify, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Log solver progress at `info` instead of `debug` (default: false)
    pub verbose: bool,
    /// Cap on Newton iterations across all barrier rounds (default: 500)
    pub max_iterations: Option<usize>,
    /// Starting `[a, b, c]` for `a·x² + 2b·x·y + c·y²`; must satisfy `a·c > b²` (default: least-squares circle)
    pub initial_guess: Option<[f64; 3]>,
    /// Relative stopping tolerance for both the Newton decrement and the barrier weight (default: 1e-12)
    pub tolerance: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig {
            verbose: false,
            max_iterations: None,
            initial_guess: None,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl FitConfig {
    pub fn max_iterations(&self) -> usize {
        self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json() {
        let config: FitConfig = serde_json::from_str(r#"{ "verbose": true }"#).unwrap();
        assert_eq!(config, FitConfig { verbose: true, ..FitConfig::default() });
        assert_eq!(config.max_iterations(), DEFAULT_MAX_ITERATIONS);

        let config: FitConfig = serde_json::from_str(r#"{ "max_iterations": 20, "initial_guess": [1, 0, 2] }"#).unwrap();
        assert_eq!(config.max_iterations(), 20);
        assert_eq!(config.initial_guess, Some([1., 0., 2.]));
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
    }
}
