#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nalgebra::Vector3;
use outdoor_motion::{
    Base, GeoPoint, MotionError, MovementSensor, OutdoorMotionService, SensorProperties,
    ServiceConfig,
};

pub const BASE: &str = "rover";
pub const SENSOR: &str = "gps";

/// A command received by [`RecordingBase`]
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Velocity { linear: f64, angular: f64 },
    Stop,
}

impl Sent {
    pub fn is_stop(&self) -> bool {
        matches!(self, Sent::Stop)
    }
}

/// Base that records every command it receives
#[derive(Debug, Default)]
pub struct RecordingBase {
    sent: Mutex<Vec<Sent>>,
    fail: Mutex<bool>,
}

impl RecordingBase {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn stop_count(&self) -> usize {
        self.sent().iter().filter(|s| s.is_stop()).count()
    }

    pub fn velocity_count(&self) -> usize {
        self.sent().iter().filter(|s| !s.is_stop()).count()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl Base for RecordingBase {
    fn name(&self) -> &str {
        BASE
    }

    async fn set_velocity(
        &self,
        linear: Vector3<f64>,
        angular: Vector3<f64>,
    ) -> Result<(), MotionError> {
        if *self.fail.lock().unwrap() {
            return Err(MotionError::Actuator("motor fault".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Velocity {
            linear: linear.y,
            angular: angular.z,
        });
        Ok(())
    }

    async fn stop(&self) -> Result<(), MotionError> {
        self.sent.lock().unwrap().push(Sent::Stop);
        Ok(())
    }
}

/// Movement sensor with settable readings
#[derive(Debug)]
pub struct ScriptedSensor {
    name: String,
    reading: Mutex<(GeoPoint, f64)>,
    fail: Mutex<bool>,
    properties: SensorProperties,
}

impl ScriptedSensor {
    pub fn new(position: GeoPoint, heading: f64) -> Self {
        ScriptedSensor {
            name: SENSOR.to_string(),
            reading: Mutex::new((position, heading)),
            fail: Mutex::new(false),
            properties: SensorProperties::all(),
        }
    }

    pub fn with_properties(mut self, properties: SensorProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn set_reading(&self, position: GeoPoint, heading: f64) {
        *self.reading.lock().unwrap() = (position, heading);
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl MovementSensor for ScriptedSensor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn properties(&self) -> Result<SensorProperties, MotionError> {
        Ok(self.properties)
    }

    async fn position(&self) -> Result<GeoPoint, MotionError> {
        if *self.fail.lock().unwrap() {
            return Err(MotionError::Sensor("no fix".to_string()));
        }
        Ok(self.reading.lock().unwrap().0)
    }

    async fn compass_heading(&self) -> Result<f64, MotionError> {
        Ok(self.reading.lock().unwrap().1)
    }
}

pub fn fast_config() -> ServiceConfig {
    ServiceConfig {
        tick_interval_ms: 10,
        ..ServiceConfig::new(BASE, SENSOR)
    }
}

pub async fn start(
    base: &Arc<RecordingBase>,
    sensor: &Arc<ScriptedSensor>,
) -> OutdoorMotionService {
    OutdoorMotionService::new(
        "outdoor-motion",
        fast_config(),
        Arc::clone(base) as Arc<dyn Base>,
        Arc::clone(sensor) as Arc<dyn MovementSensor>,
    )
    .await
    .expect("service starts")
}

/// Poll `cond` every few milliseconds until it holds or `timeout` passes
pub async fn wait_for<F: Fn() -> bool>(cond: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}
