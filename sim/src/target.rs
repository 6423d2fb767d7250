//! Target trajectory model.
//!
//! The target performs a noisy random walk in the world frame:
//!
//! z_{t+1} = z_t + (2·u_x·vx_max + i·2·u_y·vy_max) + n_t
//!
//! with `u ~ U[0, 1)` per axis (so the mean step is `vx_max + i·vy_max`) and
//! `n_t` i.i.d. Gaussian per axis. The recorded trajectory starts one step
//! after the initial position.

use calib_core::{Point, Trajectory};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Describes how the common target moves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryModel {
    /// Starting position in world coordinates (meters)
    pub initial: Point,
    /// Maximum per-step velocity along x (m/step), may be negative
    pub vel_x_max: f64,
    /// Maximum per-step velocity along y (m/step), may be negative
    pub vel_y_max: f64,
    /// Process noise std dev per axis (meters)
    pub process_noise_std: f64,
}

impl TrajectoryModel {
    /// Draw `steps` world positions.
    pub fn generate<R: Rng + ?Sized>(&self, steps: usize, rng: &mut R) -> Trajectory {
        let mut position = self.initial;
        (0..steps)
            .map(|_| {
                let dx = 2.0 * rng.gen::<f64>() * self.vel_x_max;
                let dy = 2.0 * rng.gen::<f64>() * self.vel_y_max;
                let nx: f64 = rng.sample(StandardNormal);
                let ny: f64 = rng.sample(StandardNormal);
                position += Point::new(dx, dy)
                    + Point::new(nx, ny) * self.process_noise_std;
                position
            })
            .collect()
    }
}
