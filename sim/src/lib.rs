//! `sim`: target trajectories, radar observations,
//! observation logs and recorded-detection loading.

pub mod detections;
pub mod radar_sim;
pub mod replay;
pub mod scenarios;
pub mod target;

pub use detections::{load_detections, RecordedRun};
pub use radar_sim::ObservationSimulator;
pub use replay::{load_log, save_log, ObservationLog};
pub use scenarios::{Scenario, ScenarioKind, SimRun};
pub use target::TrajectoryModel;
