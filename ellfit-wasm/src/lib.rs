//! WASM bindings for ellipse fitting.
//!
//! This crate provides JavaScript/WASM bindings for the ellfit-core library, so a browser plotting
//! layer can fit points, convert the fit to parametric form, and sample boundary points to draw.

use ellfit_core::{
    fit, sample, sample_default, Complex, Fit, FitConfig, ParametricFormEllipse,
    QuadraticFormEllipse, R2,
};
use log::{info, error};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_console_logger::DEFAULT_LOGGER;

/// Points arrive either as `{x, y}` objects or as complex numbers `{re, im}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PointInput {
    R2(R2<f64>),
    Complex(Complex<f64>),
}

impl From<PointInput> for R2<f64> {
    fn from(p: PointInput) -> Self {
        match p {
            PointInput::R2(p) => p,
            PointInput::Complex(z) => z.into(),
        }
    }
}

#[derive(Serialize)]
struct FitOutput {
    fit: Fit,
    parametric: ParametricFormEllipse,
}

#[derive(Serialize)]
struct FitAndSample {
    fit: Fit,
    parametric: ParametricFormEllipse,
    points: Vec<R2<f64>>,
}

fn points_from(points: JsValue) -> Result<Vec<R2<f64>>, JsValue> {
    let points: Vec<PointInput> = serde_wasm_bindgen::from_value(points)?;
    Ok(points.into_iter().map(R2::from).collect())
}

/// `undefined`/`null` → default config; otherwise a (partial) [`FitConfig`].
fn config_from(config: JsValue) -> Result<FitConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        Ok(FitConfig::default())
    } else {
        Ok(serde_wasm_bindgen::from_value(config)?)
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}

fn sample_n(parametric: &ParametricFormEllipse, n: Option<usize>) -> Vec<R2<f64>> {
    match n {
        Some(n) => sample(parametric, n),
        None => sample_default(parametric),
    }
}

fn fit_points_impl(points: JsValue, config: JsValue) -> Result<(Fit, ParametricFormEllipse), JsValue> {
    let points = points_from(points)?;
    let config = config_from(config)?;
    let fit = fit(&points, &config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let parametric = fit.ellipse.to_parametric();
    Ok((fit, parametric))
}

/// Initializes the logging system for WASM.
///
/// Sets up console logging and panic hooks for better error reporting in the browser.
/// Should be called once at application startup.
#[wasm_bindgen]
pub fn init_logs() {
    match log::set_logger(&DEFAULT_LOGGER) {
        Ok(_) => info!("Initialized console.logger"),
        Err(e) => error!("failed to set console.logger: {}", e),
    };
    console_error_panic_hook::set_once();
}

/// Updates the log level filter.
///
/// # Arguments
/// * `level` - Log level string: "error", "warn", "info", "debug", or "trace".
///   Defaults to "info" if empty or null.
#[wasm_bindgen]
pub fn update_log_level(level: JsValue) -> Result<(), JsValue> {
    let level: Option<String> = serde_wasm_bindgen::from_value(level)?;
    let level = ellfit_core::parse_log_level(level.as_deref())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

/// Fits an origin-centered ellipse to points.
///
/// # Arguments
/// * `points` - Array of `{x, y}` or `{re, im}` points (at least 3, not all collinear).
/// * `config` - Optional partial [`FitConfig`].
///
/// # Returns
/// `{ fit, parametric }`: the quadratic-form fit with solver status, and its parametric form.
#[wasm_bindgen]
pub fn fit_points(points: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let (fit, parametric) = fit_points_impl(points, config)?;
    to_js(&FitOutput { fit, parametric })
}

/// Converts `{a, b, c}` (for `a·x² + b·x·y + c·y² = 1`) to parametric form.
#[wasm_bindgen]
pub fn to_parametric(quadratic: JsValue) -> Result<JsValue, JsValue> {
    let quadratic: QuadraticFormEllipse = serde_wasm_bindgen::from_value(quadratic)?;
    to_js(&quadratic.to_parametric())
}

/// Samples `n` boundary points (default 1000) of a parametric ellipse, counter-clockwise.
#[wasm_bindgen]
pub fn sample_ellipse(parametric: JsValue, n: Option<usize>) -> Result<JsValue, JsValue> {
    let parametric: ParametricFormEllipse = serde_wasm_bindgen::from_value(parametric)?;
    to_js(&sample_n(&parametric, n))
}

/// [`fit_points`] followed by [`sample_ellipse`] on the result.
#[wasm_bindgen]
pub fn fit_and_sample(points: JsValue, config: JsValue, n: Option<usize>) -> Result<JsValue, JsValue> {
    let (fit, parametric) = fit_points_impl(points, config)?;
    let points = sample_n(&parametric, n);
    to_js(&FitAndSample { fit, parametric, points })
}
