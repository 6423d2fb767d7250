//! Network-wide pose averaging over two-hop chains.
//!
//! Every intermediate radar `k` gives an indirect estimate of radar `i` as
//! seen from `ref`: rotate k's estimate of i into ref's frame and add ref's
//! estimate of k. The direct path is the `k == ref` / `k == i` term. The N
//! estimates are averaged with a plain mean:
//!
//! P_avg[ref][i]     = (1/N) Σ_k P[k][i]·e^{i·θ[ref][k]} + P[ref][k]
//! θ_avg[ref][i]     = (1/N) Σ_k wrap(θ[k][i] + θ[ref][k])
//!
//! The wrap is applied to each term before summing. `ref == i` runs through
//! the same formula; on noisy input its output is close to, not exactly, the
//! identity.

use crate::{
    angle::wrap_deg,
    error::{CalibError, CalibResult},
    types::{ComplexMat, PoseMatrices, RealMat},
};
use num_complex::Complex64;
use rayon::prelude::*;

/// Average a full matrix of pairwise poses into one estimate per
/// `(reference, target)` cell. The input is left untouched.
pub fn average(poses: &PoseMatrices) -> CalibResult<PoseMatrices> {
    poses.validate()?;
    let n = poses.size();
    if n == 0 {
        return Err(CalibError::EmptyNetwork);
    }

    let p = &poses.translation;
    let theta = &poses.rotation_deg;

    // Reference rows are independent; each cell sums k in fixed order.
    let rows: Vec<Vec<(Complex64, f64)>> = (0..n)
        .into_par_iter()
        .map(|r| (0..n).map(|i| average_cell(p, theta, r, i)).collect())
        .collect();

    let translation = ComplexMat::from_fn(n, n, |r, i| rows[r][i].0);
    let rotation_deg = RealMat::from_fn(n, n, |r, i| rows[r][i].1);
    Ok(PoseMatrices {
        translation,
        rotation_deg,
    })
}

fn average_cell(p: &ComplexMat, theta: &RealMat, r: usize, i: usize) -> (Complex64, f64) {
    let n = p.nrows();
    let mut sum_p = Complex64::new(0.0, 0.0);
    let mut sum_theta = 0.0;
    for k in 0..n {
        let rot = Complex64::from_polar(1.0, theta[(r, k)].to_radians());
        sum_p += p[(k, i)] * rot + p[(r, k)];
        sum_theta += wrap_deg(theta[(k, i)] + theta[(r, k)]);
    }
    (sum_p / n as f64, sum_theta / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Exact relative poses for a global layout, built like the ground truth.
    fn consistent_poses(positions: &[Complex64], orientations: &[f64]) -> PoseMatrices {
        let n = positions.len();
        PoseMatrices {
            translation: ComplexMat::from_fn(n, n, |i, k| {
                (positions[k] - positions[i]) * Complex64::from_polar(1.0, -orientations[i].to_radians())
            }),
            rotation_deg: RealMat::from_fn(n, n, |i, k| wrap_deg(orientations[k] - orientations[i])),
        }
    }

    #[test]
    fn consistent_input_is_a_fixed_point() {
        let positions = [
            Complex64::new(0.0, -20.0),
            Complex64::new(40.0, -20.0),
            Complex64::new(40.0, 20.0),
            Complex64::new(0.0, 20.0),
        ];
        let orientations = [45.0, 135.0, 225.0, 315.0];
        let poses = consistent_poses(&positions, &orientations);
        let avg = average(&poses).unwrap();

        for r in 0..4 {
            for i in 0..4 {
                let dp = avg.translation[(r, i)] - poses.translation[(r, i)];
                assert_abs_diff_eq!(dp.norm(), 0.0, epsilon = 1e-9);
                let dt = wrap_deg(avg.rotation_deg[(r, i)] - poses.rotation_deg[(r, i)]);
                assert_abs_diff_eq!(dt, 0.0, epsilon = 1e-9);
            }
        }
        assert_abs_diff_eq!(avg.rotation_deg[(0, 1)], 90.0, epsilon = 1e-9);
    }

    #[test]
    fn input_is_not_mutated() {
        let poses = consistent_poses(
            &[Complex64::new(0.0, 0.0), Complex64::new(10.0, 5.0)],
            &[10.0, -30.0],
        );
        let before = poses.clone();
        let _ = average(&poses).unwrap();
        assert_eq!(poses, before);
    }

    #[test]
    fn self_pair_follows_general_formula() {
        // Deliberately inconsistent two-radar input: radar 1 sees radar 0 at
        // distance 8 where radar 0 sees radar 1 at distance 10.
        let mut poses = PoseMatrices::identity(2);
        poses.translation[(0, 1)] = Complex64::new(10.0, 0.0);
        poses.translation[(1, 0)] = Complex64::new(-8.0, 0.0);
        poses.rotation_deg[(0, 1)] = 0.0;
        poses.rotation_deg[(1, 0)] = 10.0;

        let avg = average(&poses).unwrap();
        // k=0: P[0][0]·1 + P[0][0] = 0;  k=1: P[1][0]·e^{i0} + P[0][1] = 2
        assert_abs_diff_eq!(avg.translation[(0, 0)].re, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(avg.translation[(0, 0)].im, 0.0, epsilon = 1e-12);
        // k=0: wrap(0 + 0) = 0;  k=1: wrap(10 + 0) = 10
        assert_abs_diff_eq!(avg.rotation_deg[(0, 0)], 5.0, epsilon = 1e-9);
        // Row 1 self-pair: k=0: P[0][1]·e^{i10°} + P[1][0];  k=1: 0
        let expected = (Complex64::new(10.0, 0.0) * Complex64::from_polar(1.0, 10f64.to_radians())
            + Complex64::new(-8.0, 0.0))
            / 2.0;
        assert_abs_diff_eq!((avg.translation[(1, 1)] - expected).norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(avg.rotation_deg[(1, 1)], 5.0, epsilon = 1e-9);
    }

    #[test]
    fn wraps_each_term_before_summing() {
        // Two terms near the seam: 170 + 20 = 190 -> -170, and 0.
        let mut poses = PoseMatrices::identity(2);
        poses.rotation_deg[(0, 1)] = 170.0;
        poses.rotation_deg[(1, 1)] = 20.0; // not identity on purpose
        let avg = average(&poses).unwrap();
        // k=0: wrap(θ[0][1] + θ[0][0]) = 170;  k=1: wrap(θ[1][1] + θ[0][1]) = wrap(190) = −170
        assert_abs_diff_eq!(avg.rotation_deg[(0, 1)], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn single_radar_network() {
        let avg = average(&PoseMatrices::identity(1)).unwrap();
        assert_eq!(avg.size(), 1);
        assert_abs_diff_eq!(avg.translation[(0, 0)].norm(), 0.0);
        assert_abs_diff_eq!(avg.rotation_deg[(0, 0)], 0.0);
    }

    #[test]
    fn rejects_empty_and_mismatched_input() {
        assert_eq!(average(&PoseMatrices::identity(0)), Err(CalibError::EmptyNetwork));
        let bad = PoseMatrices {
            translation: ComplexMat::zeros(3, 3),
            rotation_deg: RealMat::zeros(3, 2),
        };
        assert!(matches!(average(&bad), Err(CalibError::InvalidShape { .. })));
    }
}
