pub mod common;
pub mod config;
pub mod control;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod navigation;
pub mod perception;
pub mod service;
pub mod sim;

pub use crate::common::types::{GeoPoint, VelocityCommand};
pub use crate::config::ServiceConfig;
pub use crate::control::base::Base;
pub use crate::control::controllers::{compute_velocity, SteeringGains};
pub use crate::error::MotionError;
pub use crate::navigation::plan::{ExecutionId, PlanState, PlanStatus};
pub use crate::navigation::{MotionParameters, NavigationRequest};
pub use crate::perception::{MovementSensor, SensorProperties};
pub use crate::service::{ListPlanStatusesRequest, OutdoorMotionService, StopPlanRequest};

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, MotionError>;
