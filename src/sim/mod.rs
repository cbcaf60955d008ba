//! In-process simulated vehicle
//!
//! [`SimVehicle`] integrates the last velocity command over wall-clock time
//! (tokio's clock) and exposes the result through a [`SimBase`] and a
//! [`SimMovementSensor`]. Compass heading advances at `angular.z` deg/s, so
//! the sign convention matches the steering law: a negative yaw rate reduces
//! the heading.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use nalgebra::Vector3;
use tokio::time::Instant;
use tracing::trace;

use crate::common::types::GeoPoint;
use crate::control::base::Base;
use crate::error::MotionError;
use crate::navigation::geo::{offset_position, wrap_360};
use crate::perception::{MovementSensor, SensorProperties};

#[derive(Debug)]
struct SimState {
    position: GeoPoint,
    heading: f64,
    linear_mm_per_sec: f64,
    angular_degs_per_sec: f64,
    last_update: Instant,
    stop_count: usize,
    velocity_count: usize,
}

impl SimState {
    fn advance(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.last_update = now;
        if dt == 0.0 {
            return;
        }

        // split the step so turning and driving interleave
        let half = dt / 2.0;
        self.heading = wrap_360(self.heading + self.angular_degs_per_sec * half);
        let distance_m = self.linear_mm_per_sec / 1000.0 * dt;
        if distance_m != 0.0 {
            self.position = offset_position(self.position, self.heading, distance_m);
        }
        self.heading = wrap_360(self.heading + self.angular_degs_per_sec * half);
    }
}

/// A point-mass vehicle with a compass
#[derive(Debug, Clone)]
pub struct SimVehicle {
    state: Arc<Mutex<SimState>>,
}

impl SimVehicle {
    pub fn new(position: GeoPoint, heading: f64) -> Self {
        SimVehicle {
            state: Arc::new(Mutex::new(SimState {
                position,
                heading: wrap_360(heading),
                linear_mm_per_sec: 0.0,
                angular_degs_per_sec: 0.0,
                last_update: Instant::now(),
                stop_count: 0,
                velocity_count: 0,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn advanced(&self) -> MutexGuard<'_, SimState> {
        let mut state = self.state();
        state.advance(Instant::now());
        state
    }

    pub fn base(&self, name: &str) -> SimBase {
        SimBase {
            name: name.to_string(),
            vehicle: self.clone(),
        }
    }

    pub fn movement_sensor(&self, name: &str) -> SimMovementSensor {
        SimMovementSensor {
            name: name.to_string(),
            vehicle: self.clone(),
        }
    }

    pub fn position(&self) -> GeoPoint {
        self.advanced().position
    }

    pub fn heading(&self) -> f64 {
        self.advanced().heading
    }

    /// Current commanded (linear mm/s, angular deg/s)
    pub fn velocity(&self) -> (f64, f64) {
        let state = self.state();
        (state.linear_mm_per_sec, state.angular_degs_per_sec)
    }

    pub fn is_moving(&self) -> bool {
        let (linear, angular) = self.velocity();
        linear != 0.0 || angular != 0.0
    }

    /// Number of stop commands received so far
    pub fn stop_count(&self) -> usize {
        self.state().stop_count
    }

    /// Number of velocity commands received so far
    pub fn velocity_count(&self) -> usize {
        self.state().velocity_count
    }
}

/// Drive side of a [`SimVehicle`]
#[derive(Debug, Clone)]
pub struct SimBase {
    name: String,
    vehicle: SimVehicle,
}

#[async_trait]
impl Base for SimBase {
    fn name(&self) -> &str {
        &self.name
    }

    async fn set_velocity(
        &self,
        linear: Vector3<f64>,
        angular: Vector3<f64>,
    ) -> Result<(), MotionError> {
        let mut state = self.vehicle.advanced();
        state.linear_mm_per_sec = linear.y;
        state.angular_degs_per_sec = angular.z;
        state.velocity_count += 1;
        trace!("sim velocity {} mm/s {} deg/s", linear.y, angular.z);
        Ok(())
    }

    async fn stop(&self) -> Result<(), MotionError> {
        let mut state = self.vehicle.advanced();
        state.linear_mm_per_sec = 0.0;
        state.angular_degs_per_sec = 0.0;
        state.stop_count += 1;
        Ok(())
    }
}

/// Sensor side of a [`SimVehicle`]
#[derive(Debug, Clone)]
pub struct SimMovementSensor {
    name: String,
    vehicle: SimVehicle,
}

#[async_trait]
impl MovementSensor for SimMovementSensor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn properties(&self) -> Result<SensorProperties, MotionError> {
        Ok(SensorProperties::all())
    }

    async fn position(&self) -> Result<GeoPoint, MotionError> {
        Ok(self.vehicle.position())
    }

    async fn compass_heading(&self) -> Result<f64, MotionError> {
        Ok(self.vehicle.heading())
    }
}
