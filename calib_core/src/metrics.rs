//! Calibration error metrics against a known layout.

use crate::{
    angle::diff_deg,
    error::{CalibError, CalibResult},
    types::{PoseMatrices, RealMat},
};
use serde::{Deserialize, Serialize};

/// Summary statistics over the off-diagonal cells of an error matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorStats {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl ErrorStats {
    /// Statistics over every cell except the diagonal. All zero when there
    /// are no off-diagonal cells.
    pub fn off_diagonal(m: &RealMat) -> Self {
        let values: Vec<f64> = (0..m.nrows())
            .flat_map(|i| (0..m.ncols()).filter(move |&k| k != i).map(move |k| (i, k)))
            .map(|idx| m[idx])
            .collect();
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std: var.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Per-pair errors of an estimate against ground truth.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationErrors {
    /// |P_true − P_est| (meters); zero on the diagonal
    pub position: RealMat,
    /// |wrap(theta_true − theta_est)| (degrees); zero on the diagonal
    pub orientation: RealMat,
    pub position_stats: ErrorStats,
    pub orientation_stats: ErrorStats,
}

impl CalibrationErrors {
    pub fn compute(truth: &PoseMatrices, estimate: &PoseMatrices) -> CalibResult<Self> {
        truth.validate()?;
        estimate.validate()?;
        let n = truth.size();
        if estimate.size() != n {
            return Err(CalibError::InvalidShape {
                what: "estimate size",
                expected: n,
                actual: estimate.size(),
            });
        }

        let position = RealMat::from_fn(n, n, |i, k| {
            if i == k {
                0.0
            } else {
                (truth.translation[(i, k)] - estimate.translation[(i, k)]).norm()
            }
        });
        let orientation = RealMat::from_fn(n, n, |i, k| {
            if i == k {
                0.0
            } else {
                diff_deg(truth.rotation_deg[(i, k)], estimate.rotation_deg[(i, k)]).abs()
            }
        });

        Ok(Self {
            position_stats: ErrorStats::off_diagonal(&position),
            orientation_stats: ErrorStats::off_diagonal(&orientation),
            position,
            orientation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;

    #[test]
    fn stats_ignore_diagonal() {
        let m = RealMat::from_row_slice(3, 3, &[100., 1., 2., 3., 100., 4., 5., 6., 100.]);
        let s = ErrorStats::off_diagonal(&m);
        assert_abs_diff_eq!(s.mean, 3.5, epsilon = 1e-12);
        assert_abs_diff_eq!(s.min, 1.0);
        assert_abs_diff_eq!(s.max, 6.0);
        assert_abs_diff_eq!(s.std, (17.5f64 / 6.0).sqrt(), epsilon = 1e-12);
        assert_eq!(ErrorStats::off_diagonal(&RealMat::zeros(1, 1)), ErrorStats::default());
    }

    #[test]
    fn orientation_error_wraps_across_seam() {
        let mut truth = PoseMatrices::identity(2);
        let mut est = PoseMatrices::identity(2);
        truth.rotation_deg[(0, 1)] = 179.0;
        est.rotation_deg[(0, 1)] = -179.0;
        truth.translation[(1, 0)] = Complex64::new(3.0, 4.0);
        let errs = CalibrationErrors::compute(&truth, &est).unwrap();
        assert_abs_diff_eq!(errs.orientation[(0, 1)], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(errs.position[(1, 0)], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(errs.position_stats.max, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let res = CalibrationErrors::compute(&PoseMatrices::identity(3), &PoseMatrices::identity(2));
        assert!(matches!(res, Err(CalibError::InvalidShape { .. })));
    }
}
