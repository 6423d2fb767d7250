//! Scenario definitions.
//!
//! Each scenario is a four-radar layout surrounding a common target track.
//! All scenarios are deterministic given the same seed.

use crate::{radar_sim::ObservationSimulator, target::TrajectoryModel};
use calib_core::{Point, PoseMatrices, Trajectory, TrajectorySet};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sensor_models::{NetworkLayout, RadarPose};
use serde::{Deserialize, Serialize};

/// Which pre-defined layout to load.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenarioKind {
    /// Radars on the corners of a 40 m square, all facing inward
    Square,
    /// Four radars in a row, all facing +y
    Linear,
    /// Three radars along x and one at the corner above
    LShape,
    /// Radars on the vertices of a diamond, rotated a quarter turn each
    Diamond,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 4] = [
        ScenarioKind::Square,
        ScenarioKind::Linear,
        ScenarioKind::LShape,
        ScenarioKind::Diamond,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::Square => "square",
            ScenarioKind::Linear => "linear",
            ScenarioKind::LShape => "l-shape",
            ScenarioKind::Diamond => "diamond",
        }
    }
}

/// A fully configured simulation scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub seed: u64,
    pub layout: NetworkLayout,
    pub target: TrajectoryModel,
    /// Number of recorded time steps T
    pub num_steps: usize,
    /// Per-radar measurement noise std dev per axis (meters)
    pub measurement_noise_std: f64,
}

/// Ground truth and observations from one scenario run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimRun {
    /// True target positions in the world frame
    pub truth: Trajectory,
    /// One trajectory per radar, each in its local frame
    pub observations: TrajectorySet,
}

impl Scenario {
    /// Build the named scenario with the default noise (0.5 m process,
    /// 0.5 m measurement) and 100 steps.
    pub fn build(kind: ScenarioKind, seed: u64) -> Self {
        let (radars, initial) = match kind {
            ScenarioKind::Square => (
                vec![
                    RadarPose::new(0., -20., 45.),
                    RadarPose::new(40., -20., 135.),
                    RadarPose::new(40., 20., 225.),
                    RadarPose::new(0., 20., 315.),
                ],
                Point::new(20., 40.),
            ),
            ScenarioKind::Linear => (
                vec![
                    RadarPose::new(0., 0., 90.),
                    RadarPose::new(20., 0., 90.),
                    RadarPose::new(40., 0., 90.),
                    RadarPose::new(60., 0., 90.),
                ],
                Point::new(30., 30.),
            ),
            ScenarioKind::LShape => (
                vec![
                    RadarPose::new(0., 0., 45.),
                    RadarPose::new(30., 0., 90.),
                    RadarPose::new(60., 0., 135.),
                    RadarPose::new(60., 30., 225.),
                ],
                Point::new(30., 30.),
            ),
            ScenarioKind::Diamond => (
                vec![
                    RadarPose::new(30., 0., 0.),
                    RadarPose::new(60., 30., 90.),
                    RadarPose::new(30., 60., 180.),
                    RadarPose::new(0., 30., 270.),
                ],
                Point::new(30., 30.),
            ),
        };

        Scenario {
            name: kind.name().into(),
            seed,
            layout: NetworkLayout::new(radars),
            target: TrajectoryModel {
                initial,
                vel_x_max: 0.0,
                vel_y_max: -1.0,
                process_noise_std: 0.5,
            },
            num_steps: 100,
            measurement_noise_std: 0.5,
        }
    }

    /// Same scenario with different process / measurement noise.
    pub fn with_noise(mut self, process_noise_std: f64, measurement_noise_std: f64) -> Self {
        self.target.process_noise_std = process_noise_std;
        self.measurement_noise_std = measurement_noise_std;
        self
    }

    /// Same scenario recorded over `num_steps` time steps.
    pub fn with_steps(mut self, num_steps: usize) -> Self {
        self.num_steps = num_steps;
        self
    }

    /// Same scenario with a different seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generate the target track and every radar's observations.
    pub fn run(&self) -> SimRun {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let truth = self.target.generate(self.num_steps, &mut rng);
        let mut radar_sim = ObservationSimulator::new(
            self.layout.clone(),
            self.measurement_noise_std,
            self.seed.wrapping_add(1),
        );
        let observations = radar_sim.observe(&truth);
        tracing::debug!(
            scenario = %self.name,
            seed = self.seed,
            radars = observations.num_radars(),
            steps = observations.num_steps(),
            "scenario generated"
        );
        SimRun {
            truth,
            observations,
        }
    }

    /// Exact relative poses implied by the layout.
    pub fn ground_truth(&self) -> PoseMatrices {
        self.layout.relative_poses()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use calib_core::{wrap_deg, CalibrationErrors, NetworkCalibrator};

    fn mean_errors(scenario: &Scenario) -> (f64, f64) {
        let run = scenario.run();
        let out = NetworkCalibrator::default()
            .calibrate(&run.observations)
            .unwrap();
        let errs = CalibrationErrors::compute(&scenario.ground_truth(), &out.averaged).unwrap();
        (errs.position_stats.mean, errs.orientation_stats.mean)
    }

    fn trial_mean(kind: ScenarioKind, noise: f64, trials: u64) -> (f64, f64) {
        trial_mean_with(kind, noise, 100, trials)
    }

    fn trial_mean_with(kind: ScenarioKind, noise: f64, steps: usize, trials: u64) -> (f64, f64) {
        let (mut pos, mut ori) = (0.0, 0.0);
        for seed in 0..trials {
            let s = Scenario::build(kind, 1000 + seed)
                .with_noise(noise, noise)
                .with_steps(steps);
            let (p, o) = mean_errors(&s);
            pos += p;
            ori += o;
        }
        (pos / trials as f64, ori / trials as f64)
    }

    #[test]
    fn same_seed_is_reproducible() {
        let a = Scenario::build(ScenarioKind::Square, 42).run();
        let b = Scenario::build(ScenarioKind::Square, 42).run();
        assert_eq!(a.observations, b.observations);
        let c = Scenario::build(ScenarioKind::Square, 43).run();
        assert_ne!(a.observations, c.observations);
    }

    #[test]
    fn noiseless_square_recovers_layout() {
        let scenario = Scenario::build(ScenarioKind::Square, 42).with_noise(0.0, 0.0);
        let run = scenario.run();
        let out = NetworkCalibrator::default()
            .calibrate(&run.observations)
            .unwrap();

        assert_abs_diff_eq!(out.direct.rotation_deg[(0, 1)], 90.0, epsilon = 1e-9);
        // (40 + 0i) rotated by −45°
        let expected = Point::new(40.0, 0.0) * Point::from_polar(1.0, (-45f64).to_radians());
        assert_abs_diff_eq!((out.direct.translation[(0, 1)] - expected).norm(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.averaged.rotation_deg[(0, 1)], 90.0, epsilon = 1e-9);

        let truth = scenario.ground_truth();
        for i in 0..4 {
            for k in 0..4 {
                let dp = out.direct.translation[(i, k)] - truth.translation[(i, k)];
                assert_abs_diff_eq!(dp.norm(), 0.0, epsilon = 1e-8);
                let dt = wrap_deg(out.direct.rotation_deg[(i, k)] - truth.rotation_deg[(i, k)]);
                assert_abs_diff_eq!(dt, 0.0, epsilon = 1e-9);
                assert!(out.residuals[(i, k)] > -1e-6);
            }
        }
    }

    #[test]
    fn noisy_square_stays_within_regression_bounds() {
        // Averaged over seeds: cells at exactly 180° can split across the
        // seam in a single run.
        let (pos, ori) = trial_mean(ScenarioKind::Square, 0.5, 20);
        assert!(pos < 2.0, "mean position error {pos:.3} m");
        assert!(ori < 5.0, "mean orientation error {ori:.3}°");
    }

    #[test]
    fn all_layouts_calibrate() {
        for kind in ScenarioKind::ALL {
            let scenario = Scenario::build(kind, 7);
            let (pos, _) = mean_errors(&scenario);
            assert!(pos < 2.0, "{}: mean position error {pos:.3} m", scenario.name);
        }
    }

    #[test]
    fn error_grows_with_noise() {
        // Linear layout has no 180° pairs, so orientation error is smooth in noise.
        let levels = [0.1, 0.5, 1.0, 2.0];
        let means: Vec<(f64, f64)> = levels
            .iter()
            .map(|&n| trial_mean(ScenarioKind::Linear, n, 20))
            .collect();
        for w in means.windows(2) {
            assert!(w[1].0 >= w[0].0, "position error decreased: {means:?}");
            assert!(w[1].1 >= w[0].1, "orientation error decreased: {means:?}");
        }
    }

    #[test]
    fn longer_tracks_do_not_increase_error() {
        let lengths = [50, 100, 200, 500];
        let means: Vec<(f64, f64)> = lengths
            .iter()
            .map(|&t| trial_mean_with(ScenarioKind::Linear, 0.5, t, 20))
            .collect();
        for w in means.windows(2) {
            assert!(w[1].0 <= w[0].0, "position error increased: {means:?}");
            assert!(w[1].1 <= w[0].1, "orientation error increased: {means:?}");
        }

        // Orientation on the square is noisy near 180° pairs; position is not.
        let (short, _) = trial_mean_with(ScenarioKind::Square, 0.5, 50, 20);
        let (long, _) = trial_mean_with(ScenarioKind::Square, 0.5, 500, 20);
        assert!(long < short, "square: {long:.3} m at 500 steps vs {short:.3} m at 50");
    }

    #[test]
    fn with_steps_sets_track_length() {
        let run = Scenario::build(ScenarioKind::Diamond, 3).with_steps(37).run();
        assert_eq!(run.truth.len(), 37);
        assert_eq!(run.observations.num_steps(), 37);
    }
}
