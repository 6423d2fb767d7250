//! `calib_core`: Radar network self-calibration from a shared target track.
//!
//! # Module layout
//! - [`types`]: Trajectories, pose matrices, identifiers
//! - [`angle`]: Degree wrapping on (−180, 180]
//! - [`error`]: Shape errors and degenerate-input advisories
//! - [`align`]: Closed-form pairwise rigid alignment
//! - [`average`]: Two-hop network pose averaging
//! - [`network`]: Pairwise matrix assembly + averaging orchestrator
//! - [`metrics`]: Position / orientation error against ground truth

pub mod align;
pub mod angle;
pub mod average;
pub mod error;
pub mod metrics;
pub mod network;
pub mod types;

pub use align::align;
pub use angle::wrap_deg;
pub use average::average;
pub use error::{Advisory, CalibError, CalibResult, DegeneracyReason};
pub use metrics::{CalibrationErrors, ErrorStats};
pub use network::{
    calibrate_pairs, CalibrationOutput, CalibratorConfig, NetworkCalibrator, PairwiseCalibration,
};
pub use types::{PairwisePose, Point, PoseMatrices, RadarId, Trajectory, TrajectorySet};
