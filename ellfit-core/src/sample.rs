use std::f64::consts::TAU;

use nalgebra::Vector2;

use crate::{
    ellipses::parametric::ParametricFormEllipse,
    math::complex::Complex,
    r2::R2,
    rotate::{rotation_mat, Orientation},
};

pub const DEFAULT_SAMPLES: usize = 1000;

/// `n` boundary points, counter-clockwise from the end of the major axis.
///
/// Angles are spaced evenly over `[0, 2π]` with both endpoints included, so the last point repeats
/// the first and the sequence can be drawn as a closed polyline.
pub fn sample(e: &ParametricFormEllipse, n: usize) -> Vec<R2<f64>> {
    let [r0, r1] = e.semiaxis_lengths;
    let rot = rotation_mat(e.ccw_angle, Orientation::Ccw);
    let step = if n > 1 { TAU / (n - 1) as f64 } else { 0. };
    (0..n)
        .map(|i| {
            let (sin, cos) = (step * i as f64).sin_cos();
            let p = rot * Vector2::new(r0 * cos, r1 * sin);
            R2 { x: p.x, y: p.y } + e.center
        })
        .collect()
}

/// [`sample`] with the [`DEFAULT_SAMPLES`] count.
pub fn sample_default(e: &ParametricFormEllipse) -> Vec<R2<f64>> {
    sample(e, DEFAULT_SAMPLES)
}

pub fn sample_complex(e: &ParametricFormEllipse, n: usize) -> Vec<Complex<f64>> {
    sample(e, n).into_iter().map(Complex::from).collect()
}
