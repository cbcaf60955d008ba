//! Perception side of the motion service: where the vehicle is and where it faces
pub mod sensors;

pub use self::sensors::{MovementSensor, SensorProperties};
