//! Loader for detections recorded by radar nodes.
//!
//! A recording directory holds one JSON file per detection frame:
//!
//! ```json
//! { "Node": "node_a", "Range": 12.5, "Angle": -8.0 }
//! ```
//!
//! Files are read in order of the trailing number in their stem
//! (`frame_2.json` before `frame_10.json`); files without one follow in name
//! order. Frames are grouped by node, nodes are ordered by name, and every
//! node is truncated to the shortest frame count so the trajectories stay
//! aligned.

use anyhow::{bail, Context};
use calib_core::{Trajectory, TrajectorySet};
use sensor_models::PolarDetection;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One detection frame as written by a node.
#[derive(Clone, Debug, Deserialize)]
pub struct DetectionFrame {
    #[serde(rename = "Node")]
    pub node: String,
    /// Range (meters)
    #[serde(rename = "Range")]
    pub range: f64,
    /// Angle (degrees)
    #[serde(rename = "Angle")]
    pub angle: f64,
}

/// Trajectories assembled from a recording directory.
#[derive(Clone, Debug)]
pub struct RecordedRun {
    /// Node names, sorted; row `i` of `observations` belongs to `nodes[i]`
    pub nodes: Vec<String>,
    pub observations: TrajectorySet,
}

/// Group frames by node and align them into a trajectory set.
pub fn assemble(frames: impl IntoIterator<Item = DetectionFrame>) -> anyhow::Result<RecordedRun> {
    let mut by_node: BTreeMap<String, Vec<_>> = BTreeMap::new();
    for frame in frames {
        by_node
            .entry(frame.node)
            .or_default()
            .push(PolarDetection::new(frame.range, frame.angle).to_local());
    }
    if by_node.is_empty() {
        bail!("no detection frames");
    }

    let num_frames = by_node.values().map(Vec::len).min().unwrap_or(0);
    let nodes: Vec<String> = by_node.keys().cloned().collect();
    let trajectories = by_node
        .into_values()
        .map(|mut points| {
            points.truncate(num_frames);
            Trajectory::new(points)
        })
        .collect();
    let observations = TrajectorySet::new(trajectories)?;
    tracing::info!(radars = nodes.len(), frames = num_frames, "loaded recorded detections");
    Ok(RecordedRun {
        nodes,
        observations,
    })
}

/// Trailing decimal number of a file stem: `frame_0042` gives 42.
fn frame_index(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    stem[stem.len() - digits..].parse().ok()
}

/// Load every `*.json` detection frame under `dir`, in frame number order.
pub fn load_detections(dir: &Path) -> anyhow::Result<RecordedRun> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    if paths.is_empty() {
        bail!("no JSON files found in {}", dir.display());
    }
    paths.sort_by_cached_key(|p| {
        let index = frame_index(p);
        (index.is_none(), index, p.clone())
    });

    let frames = paths
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<DetectionFrame>(&text)
                .with_context(|| format!("parsing {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    assemble(frames)
}
