//! Observation models: world ↔ local frame transforms and polar detections.
//!
//! # Conventions
//! - Simulated local frame: origin at the radar, +x along the boresight,
//!   CCW positive.
//! - Recorded node detections report range (m) and angle (degrees) measured
//!   from the node's +y axis, converted as x = r·sin(a), y = r·cos(a). The
//!   constant 90° offset is common to every node and cancels in relative
//!   rotations.

use crate::radar::RadarPose;
use calib_core::Point;
use serde::{Deserialize, Serialize};

/// Trait for mapping a world-frame target position into a sensor reading.
pub trait ObservationModel {
    /// Noiseless observation of the world point `target`.
    fn observe(&self, target: Point) -> Point;
    /// World point that produces the local observation `local`.
    fn back_project(&self, local: Point) -> Point;
}

impl ObservationModel for RadarPose {
    fn observe(&self, target: Point) -> Point {
        (target - self.position) * self.world_to_local_rotation()
    }

    fn back_project(&self, local: Point) -> Point {
        self.position + local / self.world_to_local_rotation()
    }
}

/// A single range/angle detection as reported by a radar node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolarDetection {
    /// Range (meters)
    pub range_m: f64,
    /// Angle from the node's +y axis, clockwise positive (degrees)
    pub angle_deg: f64,
}

impl PolarDetection {
    pub fn new(range_m: f64, angle_deg: f64) -> Self {
        Self { range_m, angle_deg }
    }

    /// Convert to a local complex position.
    pub fn to_local(&self) -> Point {
        let a = self.angle_deg.to_radians();
        Point::new(self.range_m * a.sin(), self.range_m * a.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn observe_roundtrip() {
        let radar = RadarPose::new(40.0, -20.0, 135.0);
        let target = Point::new(20.0, 40.0);
        let local = radar.observe(target);
        let back = radar.back_project(local);
        assert_abs_diff_eq!((back - target).norm(), 0.0, epsilon = 1e-9);
        // Range is preserved by the rigid transform.
        assert_abs_diff_eq!(local.norm(), (target - radar.position).norm(), epsilon = 1e-9);
    }

    #[test]
    fn boresight_target_lies_on_local_x_axis() {
        let radar = RadarPose::new(0.0, 0.0, 90.0);
        let local = radar.observe(Point::new(0.0, 10.0));
        assert_abs_diff_eq!(local.re, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(local.im, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn polar_detection_conversion() {
        let d = PolarDetection::new(10.0, 0.0);
        let p = d.to_local();
        assert_abs_diff_eq!(p.re, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.im, 10.0, epsilon = 1e-12);
        let p = PolarDetection::new(10.0, 90.0).to_local();
        assert_abs_diff_eq!(p.re, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.im, 0.0, epsilon = 1e-12);
    }
}
