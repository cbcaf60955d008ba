//! Interface to the drive base

use crate::error::MotionError;
use async_trait::async_trait;
use nalgebra::Vector3;

/// A mobile base accepting velocity commands
#[async_trait]
pub trait Base: Send + Sync {
    /// Name the base is configured under
    fn name(&self) -> &str;

    /// Drive at `linear` (mm/s) and `angular` (deg/s)
    async fn set_velocity(
        &self,
        linear: Vector3<f64>,
        angular: Vector3<f64>,
    ) -> Result<(), MotionError>;

    async fn stop(&self) -> Result<(), MotionError>;
}
