//! `sensor_models`: Radar poses, network layouts, local frame transforms.

pub mod observation;
pub mod radar;

pub use observation::{ObservationModel, PolarDetection};
pub use radar::{NetworkLayout, RadarPose};
