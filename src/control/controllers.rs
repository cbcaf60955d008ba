//! Bearing-following steering law

use crate::common::types::{GeoPoint, VelocityCommand};
use crate::navigation::geo::{bearing_to, great_circle_distance_km, wrap_180};
use crate::navigation::MotionParameters;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tuning constants for [`compute_velocity`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringGains {
    /// Heading errors at or below this drive straight (degrees)
    pub dead_band_deg: f64,
    /// Heading errors above this turn at full rate and reduced speed (degrees)
    pub hard_turn_threshold_deg: f64,
    /// Fraction of full forward speed used during a hard turn
    pub hard_turn_speed_fraction: f64,
}

impl Default for SteeringGains {
    fn default() -> Self {
        SteeringGains {
            dead_band_deg: 0.1,
            hard_turn_threshold_deg: 40.0,
            hard_turn_speed_fraction: 0.25,
        }
    }
}

impl SteeringGains {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.dead_band_deg >= 0.0) {
            return Err(format!(
                "dead_band_deg must be >= 0, got {}",
                self.dead_band_deg
            ));
        }
        if !(self.hard_turn_threshold_deg > self.dead_band_deg
            && self.hard_turn_threshold_deg <= 180.0)
        {
            return Err(format!(
                "hard_turn_threshold_deg must be in ({}, 180], got {}",
                self.dead_band_deg, self.hard_turn_threshold_deg
            ));
        }
        if !(self.hard_turn_speed_fraction > 0.0 && self.hard_turn_speed_fraction <= 1.0) {
            return Err(format!(
                "hard_turn_speed_fraction must be in (0, 1], got {}",
                self.hard_turn_speed_fraction
            ));
        }
        Ok(())
    }
}

/// Compute the velocity command that steers from `pos` toward `goal`
///
/// Returns the zero command once `goal` is within `params.plan_deviation_mm`.
/// Outside the dead band the turn rate is proportional to the heading error up
/// to the hard-turn threshold; past it the base turns at the full configured
/// rate and slows down. The yaw rate always has the opposite sign of
/// `heading - bearing`.
pub fn compute_velocity(
    pos: GeoPoint,
    goal: GeoPoint,
    heading: f64,
    params: &MotionParameters,
    gains: &SteeringGains,
) -> VelocityCommand {
    let distance_km = great_circle_distance_km(pos, goal);
    let distance_mm = distance_km * 1000.0 * 1000.0;
    let bearing = bearing_to(pos, goal);
    let degrees_off = wrap_180(heading - bearing);

    debug!(
        "distance_km: {:.2} distance_mm: {:.2} bearing: {} degrees_off: {}",
        distance_km, distance_mm, bearing, degrees_off
    );

    if distance_mm <= params.plan_deviation_mm {
        return VelocityCommand::zero();
    }

    let full_speed = params.linear_m_per_sec * 1000.0;

    if degrees_off.abs() <= gains.dead_band_deg {
        return VelocityCommand::new(full_speed, 0.0);
    }

    if degrees_off.abs() > gains.hard_turn_threshold_deg {
        // go slow and turn
        let z = if degrees_off > 0.0 {
            -params.angular_degs_per_sec
        } else {
            params.angular_degs_per_sec
        };
        return VelocityCommand::new(full_speed * gains.hard_turn_speed_fraction, z);
    }

    let z = -(degrees_off / gains.hard_turn_threshold_deg) * params.angular_degs_per_sec;
    VelocityCommand::new(full_speed, z)
}
