//! Movement sensor interface

use crate::common::types::GeoPoint;
use crate::error::MotionError;
use async_trait::async_trait;

/// What a movement sensor is able to report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorProperties {
    pub position_supported: bool,
    pub compass_heading_supported: bool,
    pub linear_velocity_supported: bool,
    pub angular_velocity_supported: bool,
}

impl SensorProperties {
    /// Properties of a sensor that reports everything
    pub fn all() -> Self {
        SensorProperties {
            position_supported: true,
            compass_heading_supported: true,
            linear_velocity_supported: true,
            angular_velocity_supported: true,
        }
    }

    /// Check that the controller can steer by this sensor
    pub fn check_navigable(&self) -> Result<(), MotionError> {
        if !self.position_supported {
            return Err(MotionError::MissingCapability("PositionSupported"));
        }
        if !self.compass_heading_supported {
            return Err(MotionError::MissingCapability("CompassHeadingSupported"));
        }
        if !self.linear_velocity_supported {
            return Err(MotionError::MissingCapability("LinearVelocitySupported"));
        }
        if !self.angular_velocity_supported {
            return Err(MotionError::MissingCapability("AngularVelocitySupported"));
        }
        Ok(())
    }
}

/// A sensor reporting global position and compass heading
///
/// Shared between the service facade and the control loop, so all methods
/// take `&self`.
#[async_trait]
pub trait MovementSensor: Send + Sync {
    /// Name the sensor is configured under
    fn name(&self) -> &str;

    async fn properties(&self) -> Result<SensorProperties, MotionError>;

    async fn position(&self) -> Result<GeoPoint, MotionError>;

    /// Compass heading in degrees, 0 = north, clockwise positive
    async fn compass_heading(&self) -> Result<f64, MotionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_properties_are_navigable() {
        assert!(SensorProperties::all().check_navigable().is_ok());
    }

    #[test]
    fn missing_heading_is_reported() {
        let props = SensorProperties {
            compass_heading_supported: false,
            ..SensorProperties::all()
        };
        match props.check_navigable() {
            Err(MotionError::MissingCapability(cap)) => assert_eq!(cap, "CompassHeadingSupported"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn missing_position_is_checked_first() {
        let props = SensorProperties::default();
        assert_eq!(
            props.check_navigable().unwrap_err().to_string(),
            "movement sensor needs PositionSupported"
        );
    }
}
