//! Observation logs: serialize/deserialize runs for offline calibration.

use calib_core::TrajectorySet;
use sensor_models::NetworkLayout;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A recorded set of per-radar observations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObservationLog {
    pub scenario_name: String,
    pub seed: Option<u64>,
    /// Radar names in row order of `observations`
    pub radar_names: Vec<String>,
    /// True layout, when known (simulated runs)
    pub layout: Option<NetworkLayout>,
    pub observations: TrajectorySet,
}

/// Write `log` as pretty-printed JSON.
pub fn save_log(log: &ObservationLog, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), log)
        .with_context(|| format!("writing log {}", path.display()))
}

/// Read a log written by [`save_log`]. Ragged observation sets are rejected.
pub fn load_log(path: &Path) -> anyhow::Result<ObservationLog> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing log {}", path.display()))
}
