//! Network calibration orchestrator.
//!
//! # Processing steps
//! 1. Validate the trajectory set (N ≥ 1, equal lengths)
//! 2. Align every ordered pair (i, k), in parallel over pairs
//! 3. Assemble the direct `P`, `theta` and residual matrices
//! 4. Flag poorly conditioned pairs as advisories
//! 5. Average over two-hop chains

use crate::{
    align::align,
    average::average,
    error::{Advisory, CalibError, CalibResult, DegeneracyReason},
    types::{ComplexMat, PairwisePose, PoseMatrices, RadarId, RealMat, TrajectorySet},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Configuration for the network calibrator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibratorConfig {
    /// Trajectories shorter than this are flagged as degenerate.
    pub min_samples: usize,
    /// Mean squared distance from the centroid (m²) below which a
    /// trajectory carries no rotational information.
    pub min_spread: f64,
    /// Align pairs on the rayon pool instead of sequentially.
    pub parallel: bool,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            min_spread: 1e-6,
            parallel: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Direct pairwise estimates for every ordered pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairwiseCalibration {
    pub poses: PoseMatrices,
    pub residuals: RealMat,
}

/// Everything one calibration run produces, indexed `[reference][target]`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationOutput {
    /// Direct pairwise estimates
    pub direct: PoseMatrices,
    /// Residual per pair (m²)
    pub residuals: RealMat,
    /// Two-hop averaged estimates
    pub averaged: PoseMatrices,
    /// Poorly conditioned pairs (estimates still present)
    pub advisories: Vec<Advisory>,
    /// Wall-clock time of the run
    pub total_time_us: u64,
}

// ---------------------------------------------------------------------------
// Pairwise stage
// ---------------------------------------------------------------------------

/// Align every ordered pair and assemble the N×N matrices.
pub fn calibrate_pairs(set: &TrajectorySet) -> CalibResult<PairwiseCalibration> {
    calibrate_pairs_with(set, true)
}

fn calibrate_pairs_with(set: &TrajectorySet, parallel: bool) -> CalibResult<PairwiseCalibration> {
    let n = set.num_radars();
    if n == 0 {
        return Err(CalibError::EmptyNetwork);
    }
    let trajectories: Vec<_> = set.iter().collect();

    let solve = |idx: usize| -> CalibResult<PairwisePose> {
        let (i, k) = (idx / n, idx % n);
        align(trajectories[i], trajectories[k])
    };
    let pairs: Vec<PairwisePose> = if parallel {
        (0..n * n).into_par_iter().map(solve).collect::<CalibResult<_>>()?
    } else {
        (0..n * n).map(solve).collect::<CalibResult<_>>()?
    };

    let at = |i: usize, k: usize| &pairs[i * n + k];
    Ok(PairwiseCalibration {
        poses: PoseMatrices {
            translation: ComplexMat::from_fn(n, n, |i, k| at(i, k).translation),
            rotation_deg: RealMat::from_fn(n, n, |i, k| at(i, k).rotation_deg),
        },
        residuals: RealMat::from_fn(n, n, |i, k| at(i, k).residual),
    })
}

// ---------------------------------------------------------------------------
// Calibrator
// ---------------------------------------------------------------------------

/// Runs the pairwise stage and the network average with a fixed config.
#[derive(Clone, Debug, Default)]
pub struct NetworkCalibrator {
    pub config: CalibratorConfig,
}

impl NetworkCalibrator {
    pub fn new(config: CalibratorConfig) -> Self {
        Self { config }
    }

    /// Calibrate the whole network from one set of trajectories.
    pub fn calibrate(&self, set: &TrajectorySet) -> CalibResult<CalibrationOutput> {
        let start = Instant::now();
        let n = set.num_radars();
        tracing::debug!(radars = n, steps = set.num_steps(), "calibrating network");

        let advisories = self.advisories(set);
        for advisory in &advisories {
            tracing::warn!(%advisory, "degenerate calibration input");
        }

        let pairwise = calibrate_pairs_with(set, self.config.parallel)?;
        let averaged = average(&pairwise.poses)?;

        let total_time_us = start.elapsed().as_micros() as u64;
        tracing::debug!(elapsed_us = total_time_us, "network calibration done");

        Ok(CalibrationOutput {
            direct: pairwise.poses,
            residuals: pairwise.residuals,
            averaged,
            advisories,
            total_time_us,
        })
    }

    /// Flag pairs whose trajectories are too short or too static to carry
    /// rotation information. Self-pairs are skipped.
    pub fn advisories(&self, set: &TrajectorySet) -> Vec<Advisory> {
        let steps = set.num_steps();
        let spreads: Vec<f64> = set.iter().map(|t| t.spread()).collect();
        let n = spreads.len();
        let mut out = Vec::new();

        for i in 0..n {
            for k in 0..n {
                if i == k {
                    continue;
                }
                let reason = if steps < self.config.min_samples {
                    Some(DegeneracyReason::TooFewSamples {
                        samples: steps,
                        minimum: self.config.min_samples,
                    })
                } else {
                    let spread = spreads[i].min(spreads[k]);
                    (spread < self.config.min_spread).then_some(DegeneracyReason::LowSpread {
                        spread,
                        minimum: self.config.min_spread,
                    })
                };
                if let Some(reason) = reason {
                    out.push(Advisory::DegenerateInput {
                        reference: RadarId(i),
                        target: RadarId(k),
                        reason,
                    });
                }
            }
        }
        out
    }
}
