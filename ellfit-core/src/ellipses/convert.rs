use log::debug;
use nalgebra::Matrix2;
use ordered_float::OrderedFloat;

use crate::{math::pinv::pinv_default, r2::R2};

use super::{parametric::ParametricFormEllipse, quadratic::QuadraticFormEllipse};

impl QuadraticFormEllipse {
    /// Symmetric matrix `S` with `pᵀ·S·p = A·x² + B·x·y + C·y²`.
    pub fn matrix(&self) -> Matrix2<f64> {
        let off = self.b() / 2.;
        Matrix2::new(self.a(), off, off, self.c())
    }

    /// Parametric form via eigendecomposition of [`Self::matrix`].
    ///
    /// Each eigenvalue `λ` corresponds to a semi-axis of length `sqrt(|1/λ|)` along its eigenvector;
    /// (near-)zero eigenvalues map to length `0`. The major-axis angle is returned in `(-π/2, π/2]`.
    /// When both lengths are equal, the eigenvector order from the decomposition decides the angle.
    pub fn to_parametric(&self) -> ParametricFormEllipse {
        let eigen = self.matrix().symmetric_eigen();
        let lengths: Vec<f64> = pinv_default(eigen.eigenvalues.as_slice())
            .into_iter()
            .map(|v| v.abs().sqrt())
            .collect();
        let mut axes: Vec<(f64, R2<f64>)> = (0..2)
            .map(|i| {
                let v = eigen.eigenvectors.column(i);
                (lengths[i], R2 { x: v[0], y: v[1] })
            })
            .collect();
        axes.sort_by_key(|(length, _)| std::cmp::Reverse(OrderedFloat(*length)));
        let (major, major_axis) = axes[0];
        let (minor, _) = axes[1];
        let ccw_angle = major_axis.y.atan2(major_axis.x);
        debug!("{} → eigenvalues {:?}, lengths ({}, {}), angle {}", self, eigen.eigenvalues.as_slice(), major, minor, ccw_angle);
        ParametricFormEllipse::centered([major, minor], ccw_angle).canonical()
    }
}

impl From<&QuadraticFormEllipse> for ParametricFormEllipse {
    fn from(q: &QuadraticFormEllipse) -> Self {
        q.to_parametric()
    }
}
