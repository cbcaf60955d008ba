//! Navigation requests and motion parameters
pub mod geo;
pub mod plan;

use crate::common::types::GeoPoint;
use serde::{Deserialize, Serialize};

/// Floor for the arrival threshold (mm)
pub const MIN_PLAN_DEVIATION_MM: f64 = 1000.0;
/// Floor for the forward speed (m/s)
pub const MIN_LINEAR_M_PER_SEC: f64 = 1.0;
/// Floor for the turn rate (deg/s)
pub const MIN_ANGULAR_DEGS_PER_SEC: f64 = 10.0;

/// Speeds and arrival threshold for one navigation request
///
/// Fields left at zero (or negative) are filled in from the service
/// configuration by [`crate::config::ServiceConfig::fix_motion_parameters`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParameters {
    /// Distance to the destination at which the plan counts as arrived
    pub plan_deviation_mm: f64,
    /// Forward speed
    pub linear_m_per_sec: f64,
    /// Turn rate
    pub angular_degs_per_sec: f64,
}

impl MotionParameters {
    pub fn new(plan_deviation_mm: f64, linear_m_per_sec: f64, angular_degs_per_sec: f64) -> Self {
        MotionParameters {
            plan_deviation_mm,
            linear_m_per_sec,
            angular_degs_per_sec,
        }
    }

    /// True when every field is strictly positive
    pub fn is_complete(&self) -> bool {
        self.plan_deviation_mm > 0.0
            && self.linear_m_per_sec > 0.0
            && self.angular_degs_per_sec > 0.0
    }
}

/// A request to drive the base to a point on the globe
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRequest {
    /// Name of the base to drive; must match the configured base
    pub component_name: String,
    /// Name of the movement sensor to steer by; must match the configured sensor
    pub movement_sensor_name: String,
    pub destination: GeoPoint,
    /// Optional overrides; missing values fall back to configured defaults
    pub parameters: Option<MotionParameters>,
}

impl NavigationRequest {
    pub fn new(component_name: &str, movement_sensor_name: &str, destination: GeoPoint) -> Self {
        NavigationRequest {
            component_name: component_name.to_string(),
            movement_sensor_name: movement_sensor_name.to_string(),
            destination,
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: MotionParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}
