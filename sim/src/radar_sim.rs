//! Radar observation simulator.
//!
//! Each radar sees the common target in its own local frame,
//! `(z − pos)·e^{−i·o}`, plus i.i.d. Gaussian measurement noise per axis.

use calib_core::{Point, Trajectory, TrajectorySet};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use sensor_models::{NetworkLayout, ObservationModel};

/// Generates per-radar observations of a world-frame trajectory.
pub struct ObservationSimulator {
    pub layout: NetworkLayout,
    /// Measurement noise std dev per axis (meters)
    pub measurement_noise_std: f64,
    rng: ChaCha8Rng,
}

impl ObservationSimulator {
    pub fn new(layout: NetworkLayout, measurement_noise_std: f64, seed: u64) -> Self {
        Self {
            layout,
            measurement_noise_std,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Observe `truth` from every radar, radar by radar.
    pub fn observe(&mut self, truth: &Trajectory) -> TrajectorySet {
        let sigma = self.measurement_noise_std;
        let rng = &mut self.rng;
        let trajectories = self
            .layout
            .radars
            .iter()
            .map(|radar| {
                truth
                    .samples()
                    .iter()
                    .map(|&z| {
                        let nx: f64 = rng.sample(StandardNormal);
                        let ny: f64 = rng.sample(StandardNormal);
                        radar.observe(z) + Point::new(nx, ny) * sigma
                    })
                    .collect::<Trajectory>()
            })
            .collect();
        TrajectorySet::new(trajectories).expect("every radar observes the same samples")
    }
}
