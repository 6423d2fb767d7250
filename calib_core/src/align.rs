//! Closed-form pairwise alignment of two radar trajectories.
//!
//! # Model
//! Both radars observe the same target. With `z_i` the samples in radar
//! i's frame and `z_k` those in radar k's frame, the rigid relation is
//!
//! z_i[t] = p + e^{iθ}·z_k[t]
//!
//! and the least-squares `(θ, p)` minimizing Σ|z_i − p − e^{iθ}z_k|² is
//! available in closed form (rigid Procrustes in the complex plane):
//!
//! - val = Σ (z_k − z̄_k)·conj(z_i − z̄_i)
//! - φ = arg(val), θ = −φ
//! - p = z̄_i − e^{−iφ}·z̄_k
//! - residual = Σ (|z_k − z̄_k|² + |z_i − z̄_i|²) − 2|val|
//!
//! No iteration and no local minima; O(T) per pair.

use crate::{
    angle::wrap_deg,
    error::{CalibError, CalibResult},
    types::{PairwisePose, Point, Trajectory},
};
use num_complex::Complex64;

/// Align `target` onto `reference`: returns the pose of the target radar as
/// seen from the reference radar, plus the residual misalignment energy.
///
/// Fails only on shape: the two trajectories must have the same, non-zero
/// length. Non-finite samples are not checked and propagate into the result.
pub fn align(reference: &Trajectory, target: &Trajectory) -> CalibResult<PairwisePose> {
    align_samples(reference.samples(), target.samples())
}

/// Slice form of [`align`].
pub fn align_samples(z_i: &[Point], z_k: &[Point]) -> CalibResult<PairwisePose> {
    if z_i.len() != z_k.len() {
        return Err(CalibError::InvalidShape {
            what: "paired trajectory length",
            expected: z_i.len(),
            actual: z_k.len(),
        });
    }
    if z_i.is_empty() {
        return Err(CalibError::InvalidShape {
            what: "trajectory samples",
            expected: 1,
            actual: 0,
        });
    }

    let n = z_i.len() as f64;
    let mean_i: Point = z_i.iter().sum::<Point>() / n;
    let mean_k: Point = z_k.iter().sum::<Point>() / n;

    let mut val = Complex64::new(0.0, 0.0);
    let mut energy = 0.0;
    for (a, b) in z_i.iter().zip(z_k) {
        let di = a - mean_i;
        let dk = b - mean_k;
        val += dk * di.conj();
        energy += dk.norm_sqr() + di.norm_sqr();
    }

    let phi = val.im.atan2(val.re);
    let translation = mean_i - Complex64::from_polar(1.0, -phi) * mean_k;
    let residual = energy - 2.0 * val.norm();

    Ok(PairwisePose {
        translation,
        rotation_deg: wrap_deg((-phi).to_degrees()),
        residual,
    })
}
