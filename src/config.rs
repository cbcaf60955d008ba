//! Service configuration
//!
//! Config is read from the `[outdoor-motion]` section of a TOML file:
//!
//! ```toml
//! [outdoor-motion]
//! base = "rover"
//! movement_sensor = "gps"
//! deviation_meters = 2.0
//! speed_kmh = 5.0
//! speed_degrees_per_second = 30.0
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::control::controllers::SteeringGains;
use crate::error::MotionError;
use crate::navigation::{
    MotionParameters, MIN_ANGULAR_DEGS_PER_SEC, MIN_LINEAR_M_PER_SEC, MIN_PLAN_DEVIATION_MM,
};

/// Section key in the config file
pub const SECTION_KEY: &str = "outdoor-motion";

/// Default control loop period
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Name of the base to drive
    pub base: String,
    /// Name of the movement sensor to steer by
    pub movement_sensor: String,
    /// Default arrival threshold
    pub deviation_meters: f64,
    /// Default forward speed
    pub speed_kmh: f64,
    /// Default turn rate
    pub speed_degrees_per_second: f64,
    /// Control loop period
    pub tick_interval_ms: u64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
    pub steering: SteeringGains,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            base: String::new(),
            movement_sensor: String::new(),
            deviation_meters: 0.0,
            speed_kmh: 0.0,
            speed_degrees_per_second: 0.0,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            log_level: None,
            steering: SteeringGains::default(),
        }
    }
}

impl ServiceConfig {
    pub fn new(base: &str, movement_sensor: &str) -> Self {
        ServiceConfig {
            base: base.to_string(),
            movement_sensor: movement_sensor.to_string(),
            ..Self::default()
        }
    }

    /// Check the config and return the dependency names it refers to
    pub fn validate(&self) -> Result<Vec<String>, MotionError> {
        if self.base.is_empty() {
            return Err(MotionError::Config("need a base".to_string()));
        }
        if self.movement_sensor.is_empty() {
            return Err(MotionError::Config("need a movement_sensor".to_string()));
        }
        if self.tick_interval_ms == 0 {
            return Err(MotionError::Config(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        self.steering.validate().map_err(MotionError::Config)?;
        Ok(vec![self.base.clone(), self.movement_sensor.clone()])
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Fill in every missing or non-positive motion parameter
    ///
    /// Each replacement is the configured default, raised to a fixed floor, so
    /// the result is always strictly positive.
    pub fn fix_motion_parameters(&self, requested: Option<MotionParameters>) -> MotionParameters {
        let mut params = requested.unwrap_or_default();

        if !(params.plan_deviation_mm > 0.0) {
            params.plan_deviation_mm = MIN_PLAN_DEVIATION_MM.max(self.deviation_meters * 1000.0);
        }
        if !(params.linear_m_per_sec > 0.0) {
            params.linear_m_per_sec = MIN_LINEAR_M_PER_SEC.max(self.speed_kmh * 1000.0 / 3600.0);
        }
        if !(params.angular_degs_per_sec > 0.0) {
            params.angular_degs_per_sec =
                MIN_ANGULAR_DEGS_PER_SEC.max(self.speed_degrees_per_second);
        }

        params
    }

    /// Parse the `[outdoor-motion]` section of a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, MotionError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| MotionError::Config(e.to_string()))?;

        let Some(section) = table.get(SECTION_KEY) else {
            return Err(MotionError::Config(format!("missing [{}] section", SECTION_KEY)));
        };

        section
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| MotionError::Config(e.to_string()))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, MotionError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MotionError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| MotionError::Config(format!("{}: {}", path.display(), e)))
    }

    /// An annotated config file suitable as a starting point
    pub fn example_toml() -> String {
        format!(
            r#"[{section}]
# Base to drive and movement sensor to steer by
base = "rover"
movement_sensor = "gps"

# Defaults for requests that leave motion parameters unset
deviation_meters = 2.0
speed_kmh = 5.0
speed_degrees_per_second = 30.0

# Control loop period
tick_interval_ms = {tick}

log_level = "info"

[{section}.steering]
dead_band_deg = 0.1
hard_turn_threshold_deg = 40.0
hard_turn_speed_fraction = 0.25
"#,
            section = SECTION_KEY,
            tick = DEFAULT_TICK_INTERVAL_MS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_names() {
        assert!(ServiceConfig::default().validate().is_err());
        assert_eq!(
            ServiceConfig::new("rover", "").validate().unwrap_err().to_string(),
            "invalid configuration: need a movement_sensor"
        );
        assert_eq!(
            ServiceConfig::new("rover", "gps").validate().unwrap(),
            vec!["rover".to_string(), "gps".to_string()]
        );
    }

    #[test]
    fn validate_rejects_zero_tick() {
        let cfg = ServiceConfig {
            tick_interval_ms: 0,
            ..ServiceConfig::new("rover", "gps")
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn fix_motion_parameters_uses_floors() {
        let cfg = ServiceConfig::new("rover", "gps");
        let params = cfg.fix_motion_parameters(None);
        assert_eq!(params, MotionParameters::new(1000.0, 1.0, 10.0));
    }

    #[test]
    fn fix_motion_parameters_uses_configured_defaults() {
        let cfg = ServiceConfig {
            deviation_meters: 3.0,
            speed_kmh: 7.2,
            speed_degrees_per_second: 45.0,
            ..ServiceConfig::new("rover", "gps")
        };
        let params = cfg.fix_motion_parameters(Some(MotionParameters::new(0.0, -1.0, 0.0)));
        assert_eq!(params.plan_deviation_mm, 3000.0);
        assert!((params.linear_m_per_sec - 2.0).abs() < 1e-9);
        assert_eq!(params.angular_degs_per_sec, 45.0);
    }

    #[test]
    fn fix_motion_parameters_keeps_positive_values() {
        let cfg = ServiceConfig {
            speed_kmh: 36.0,
            ..ServiceConfig::new("rover", "gps")
        };
        let params = cfg.fix_motion_parameters(Some(MotionParameters::new(250.0, 0.5, 5.0)));
        assert_eq!(params, MotionParameters::new(250.0, 0.5, 5.0));
    }

    #[test]
    fn configured_defaults_below_floor_are_raised() {
        let cfg = ServiceConfig {
            deviation_meters: 0.2,
            speed_kmh: 1.8,
            speed_degrees_per_second: 4.0,
            ..ServiceConfig::new("rover", "gps")
        };
        let params = cfg.fix_motion_parameters(None);
        assert!(params.is_complete());
        assert_eq!(params, MotionParameters::new(1000.0, 1.0, 10.0));
    }

    #[test]
    fn parse_section() {
        let cfg = ServiceConfig::from_toml_str(
            r#"
[outdoor-motion]
base = "rover"
movement_sensor = "gps"
speed_kmh = 5.0
"#,
        )
        .unwrap();
        assert_eq!(cfg.base, "rover");
        assert_eq!(cfg.movement_sensor, "gps");
        assert_eq!(cfg.speed_kmh, 5.0);
        assert_eq!(cfg.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(cfg.steering, SteeringGains::default());
    }

    #[test]
    fn parse_missing_section() {
        let err = ServiceConfig::from_toml_str("[other]\nbase = \"rover\"\n").unwrap_err();
        assert!(err.to_string().contains("missing [outdoor-motion] section"));
    }

    #[test]
    fn example_parses_and_validates() {
        let cfg = ServiceConfig::from_toml_str(&ServiceConfig::example_toml()).unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.log_level.as_deref(), Some("info"));
        assert_eq!(cfg.steering, SteeringGains::default());
    }
}
