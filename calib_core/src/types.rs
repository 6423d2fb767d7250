//! Fundamental types used across the entire workspace.

use crate::error::{CalibError, CalibResult};
use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Scalar types: complex samples are x + iy in meters, angles are degrees.
// ---------------------------------------------------------------------------

/// A 2D point in a radar's local frame, `x + iy` (meters).
pub type Point = Complex64;

/// N×N complex matrix indexed `[reference][target]`.
pub type ComplexMat = DMatrix<Complex64>;

/// N×N real matrix indexed `[reference][target]`.
pub type RealMat = DMatrix<f64>;

// ---------------------------------------------------------------------------
// Identifier types
// ---------------------------------------------------------------------------

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RadarId(pub usize);

impl fmt::Display for RadarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0 + 1)
    }
}

// ---------------------------------------------------------------------------
// Trajectories
// ---------------------------------------------------------------------------

/// Target positions observed by one radar, one sample per time step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory(Vec<Point>);

impl Trajectory {
    pub fn new(samples: Vec<Point>) -> Self {
        Self(samples)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn samples(&self) -> &[Point] {
        &self.0
    }

    /// Sample mean. Returns `None` for an empty trajectory.
    pub fn mean(&self) -> Option<Point> {
        if self.0.is_empty() {
            return None;
        }
        let sum: Point = self.0.iter().sum();
        Some(sum / self.0.len() as f64)
    }

    /// Mean squared distance from the sample mean (m²).
    pub fn spread(&self) -> f64 {
        match self.mean() {
            Some(m) => self.0.iter().map(|z| (z - m).norm_sqr()).sum::<f64>() / self.0.len() as f64,
            None => 0.0,
        }
    }
}

impl From<Vec<Point>> for Trajectory {
    fn from(samples: Vec<Point>) -> Self {
        Self(samples)
    }
}

impl FromIterator<Point> for Trajectory {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One trajectory per radar, all of the same length and temporally aligned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Trajectory>", into = "Vec<Trajectory>")]
pub struct TrajectorySet {
    trajectories: Vec<Trajectory>,
}

impl TrajectorySet {
    /// Build a set, rejecting radars whose sample counts differ from radar 0.
    pub fn new(trajectories: Vec<Trajectory>) -> CalibResult<Self> {
        if let Some(first) = trajectories.first() {
            let expected = first.len();
            if let Some(bad) = trajectories.iter().find(|t| t.len() != expected) {
                return Err(CalibError::InvalidShape {
                    what: "trajectory length",
                    expected,
                    actual: bad.len(),
                });
            }
        }
        Ok(Self { trajectories })
    }

    /// Number of radars N.
    pub fn num_radars(&self) -> usize {
        self.trajectories.len()
    }

    /// Number of time steps T (0 for an empty set).
    pub fn num_steps(&self) -> usize {
        self.trajectories.first().map_or(0, Trajectory::len)
    }

    pub fn get(&self, radar: RadarId) -> Option<&Trajectory> {
        self.trajectories.get(radar.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.trajectories.iter()
    }
}

impl TryFrom<Vec<Trajectory>> for TrajectorySet {
    type Error = CalibError;

    fn try_from(trajectories: Vec<Trajectory>) -> CalibResult<Self> {
        Self::new(trajectories)
    }
}

impl From<TrajectorySet> for Vec<Trajectory> {
    fn from(set: TrajectorySet) -> Self {
        set.trajectories
    }
}

// ---------------------------------------------------------------------------
// Poses
// ---------------------------------------------------------------------------

/// Result of aligning one radar's trajectory onto another's.
///
/// With `z_ref = translation + exp(i·rotation)·z_target`, `translation` is the
/// target radar's origin and `rotation_deg` its heading, both as seen from the
/// reference radar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairwisePose {
    pub translation: Point,
    /// Rotation in degrees, in (−180, 180]
    pub rotation_deg: f64,
    /// Unnormalized least-squares misalignment energy (m²)
    pub residual: f64,
}

/// Two parallel N×N matrices: translation `P` and rotation `theta` (degrees).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseMatrices {
    pub translation: ComplexMat,
    pub rotation_deg: RealMat,
}

impl PoseMatrices {
    /// All-identity matrices for `n` radars.
    pub fn identity(n: usize) -> Self {
        Self {
            translation: ComplexMat::zeros(n, n),
            rotation_deg: RealMat::zeros(n, n),
        }
    }

    /// Pair the two matrices after checking they are square and the same size.
    pub fn new(translation: ComplexMat, rotation_deg: RealMat) -> CalibResult<Self> {
        let poses = Self {
            translation,
            rotation_deg,
        };
        poses.validate()?;
        Ok(poses)
    }

    /// Number of radars N.
    pub fn size(&self) -> usize {
        self.translation.nrows()
    }

    /// Reject non-square matrices or a size mismatch between `P` and `theta`.
    pub fn validate(&self) -> CalibResult<()> {
        let n = self.translation.nrows();
        if self.translation.ncols() != n {
            return Err(CalibError::InvalidShape {
                what: "translation matrix columns",
                expected: n,
                actual: self.translation.ncols(),
            });
        }
        if self.rotation_deg.nrows() != n {
            return Err(CalibError::InvalidShape {
                what: "rotation matrix rows",
                expected: n,
                actual: self.rotation_deg.nrows(),
            });
        }
        if self.rotation_deg.ncols() != n {
            return Err(CalibError::InvalidShape {
                what: "rotation matrix columns",
                expected: n,
                actual: self.rotation_deg.ncols(),
            });
        }
        Ok(())
    }

    /// Pose of `target` as seen from `reference`.
    pub fn get(&self, reference: RadarId, target: RadarId) -> (Point, f64) {
        (
            self.translation[(reference.0, target.0)],
            self.rotation_deg[(reference.0, target.0)],
        )
    }
}
