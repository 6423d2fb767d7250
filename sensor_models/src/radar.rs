//! Radar poses and network layouts.

use calib_core::{
    angle::wrap_deg,
    types::{ComplexMat, RealMat},
    Point, PoseMatrices,
};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Global pose of one radar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadarPose {
    /// Radar position in world coordinates (meters, x + iy)
    pub position: Point,
    /// Heading of the radar boresight, CCW from +x (degrees)
    pub orientation_deg: f64,
}

impl RadarPose {
    pub fn new(x: f64, y: f64, orientation_deg: f64) -> Self {
        Self {
            position: Point::new(x, y),
            orientation_deg,
        }
    }

    /// Unit rotation taking world directions into this radar's frame.
    pub fn world_to_local_rotation(&self) -> Complex64 {
        Complex64::from_polar(1.0, -self.orientation_deg.to_radians())
    }
}

/// Fixed positions and headings of every radar in the network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkLayout {
    pub radars: Vec<RadarPose>,
}

impl NetworkLayout {
    pub fn new(radars: Vec<RadarPose>) -> Self {
        Self { radars }
    }

    pub fn len(&self) -> usize {
        self.radars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radars.is_empty()
    }

    /// Exact pose of every radar as seen from every other radar:
    ///
    /// P[i][k]     = (pos_k − pos_i)·e^{−i·o_i}
    /// theta[i][k] = wrap(o_k − o_i)
    pub fn relative_poses(&self) -> PoseMatrices {
        let n = self.radars.len();
        let r = &self.radars;
        PoseMatrices {
            translation: ComplexMat::from_fn(n, n, |i, k| {
                (r[k].position - r[i].position) * r[i].world_to_local_rotation()
            }),
            rotation_deg: RealMat::from_fn(n, n, |i, k| {
                wrap_deg(r[k].orientation_deg - r[i].orientation_deg)
            }),
        }
    }
}
