//! Common types shared across the motion service

pub mod types {
    use nalgebra::Vector3;
    use serde::{Deserialize, Serialize};

    /// A point on the globe (latitude, longitude in degrees)
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    pub struct GeoPoint {
        pub lat: f64,
        pub lng: f64,
    }

    impl GeoPoint {
        pub fn new(lat: f64, lng: f64) -> Self {
            GeoPoint { lat, lng }
        }
    }

    impl std::fmt::Display for GeoPoint {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "({:.6}, {:.6})", self.lat, self.lng)
        }
    }

    /// Velocity command for the base
    ///
    /// Only `linear.y` (mm/s, forward) and `angular.z` (deg/s, yaw) are used.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct VelocityCommand {
        pub linear: Vector3<f64>,
        pub angular: Vector3<f64>,
    }

    impl VelocityCommand {
        pub fn new(linear_mm_per_sec: f64, angular_degs_per_sec: f64) -> Self {
            VelocityCommand {
                linear: Vector3::new(0.0, linear_mm_per_sec, 0.0),
                angular: Vector3::new(0.0, 0.0, angular_degs_per_sec),
            }
        }

        /// The stop command, also returned when the goal is reached
        pub fn zero() -> Self {
            VelocityCommand {
                linear: Vector3::zeros(),
                angular: Vector3::zeros(),
            }
        }

        pub fn is_zero(&self) -> bool {
            self.linear.y == 0.0 && self.angular.z == 0.0
        }

        /// Forward speed in km/h
        pub fn linear_kmh(&self) -> f64 {
            self.linear.y / 277.778
        }
    }
}

#[cfg(test)]
mod tests {
    use super::types::*;

    #[test]
    fn zero_command_is_zero() {
        assert!(VelocityCommand::zero().is_zero());
        assert!(!VelocityCommand::new(1.0, 0.0).is_zero());
        assert!(!VelocityCommand::new(0.0, -3.0).is_zero());
    }

    #[test]
    fn command_uses_forward_and_yaw_components() {
        let cmd = VelocityCommand::new(500.0, 12.0);
        assert_eq!(cmd.linear.x, 0.0);
        assert_eq!(cmd.linear.y, 500.0);
        assert_eq!(cmd.angular.z, 12.0);
    }

    #[test]
    fn linear_kmh_conversion() {
        // 1 m/s is 3.6 km/h
        let cmd = VelocityCommand::new(1000.0, 0.0);
        assert!((cmd.linear_kmh() - 3.6).abs() < 0.001);
    }
}
