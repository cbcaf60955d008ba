//! Outdoor motion service: the API callers use to submit, stop and watch plans
//!
//! The service owns the plan store and the control loop. Construction checks
//! the configuration and the movement sensor's capabilities, then starts the
//! loop; [`OutdoorMotionService::close`] stops it and returns once the base
//! has received its final stop command.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::info;

use crate::common::types::GeoPoint;
use crate::config::ServiceConfig;
use crate::control::base::Base;
use crate::control::{CommandGate, ControlLoop, ControlLoopHandle};
use crate::error::MotionError;
use crate::lifecycle::{Lifecycle, State};
use crate::navigation::plan::{ExecutionId, PlanState, PlanStatus, PlanStore};
use crate::navigation::NavigationRequest;
use crate::perception::MovementSensor;

/// Request to stop the plan driving a base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopPlanRequest {
    pub component_name: String,
}

impl StopPlanRequest {
    pub fn new(component_name: &str) -> Self {
        StopPlanRequest {
            component_name: component_name.to_string(),
        }
    }
}

/// Filter for [`OutdoorMotionService::list_plan_statuses`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListPlanStatusesRequest {
    /// Only report a plan that is still in progress
    pub only_active_plans: bool,
}

pub struct OutdoorMotionService {
    name: String,
    config: ServiceConfig,
    base: Arc<dyn Base>,
    store: Arc<PlanStore>,
    command_gate: CommandGate,
    lifecycle: Mutex<Lifecycle>,
    control_loop: Mutex<Option<ControlLoopHandle>>,
}

impl OutdoorMotionService {
    /// Validate the configuration and collaborators and start the control loop
    ///
    /// Must be called from within a tokio runtime.
    pub async fn new(
        name: &str,
        config: ServiceConfig,
        base: Arc<dyn Base>,
        movement_sensor: Arc<dyn MovementSensor>,
    ) -> Result<Self, MotionError> {
        config.validate()?;

        if base.name() != config.base {
            return Err(MotionError::Config(format!(
                "cannot load base ({}): got {}",
                config.base,
                base.name()
            )));
        }
        if movement_sensor.name() != config.movement_sensor {
            return Err(MotionError::Config(format!(
                "cannot load movement sensor ({}): got {}",
                config.movement_sensor,
                movement_sensor.name()
            )));
        }

        movement_sensor.properties().await?.check_navigable()?;

        let store = Arc::new(PlanStore::new());
        let command_gate: CommandGate = Arc::new(AsyncMutex::new(()));
        let control_loop = ControlLoop::new(
            Arc::clone(&store),
            Arc::clone(&base),
            Arc::clone(&movement_sensor),
            Arc::clone(&command_gate),
            config.steering,
            config.tick_interval(),
        );

        let mut lifecycle = Lifecycle::new(name);
        let handle = control_loop.spawn();
        lifecycle.transition(State::Active)?;
        info!(
            "{} started: base {} movement sensor {} tick {:?}",
            name,
            config.base,
            config.movement_sensor,
            config.tick_interval()
        );

        Ok(OutdoorMotionService {
            name: name.to_string(),
            config,
            base,
            store,
            command_gate,
            lifecycle: Mutex::new(lifecycle),
            control_loop: Mutex::new(Some(handle)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_base_name(&self, requested: &str) -> Result<(), MotionError> {
        if requested != self.config.base {
            return Err(MotionError::NameMismatch {
                kind: "base",
                requested: requested.to_string(),
                configured: self.config.base.clone(),
            });
        }
        Ok(())
    }

    /// Start driving toward `req.destination`, replacing any plan in progress
    pub fn move_on_globe(&self, req: NavigationRequest) -> Result<ExecutionId, MotionError> {
        self.check_base_name(&req.component_name)?;
        if req.movement_sensor_name != self.config.movement_sensor {
            return Err(MotionError::NameMismatch {
                kind: "movement sensor",
                requested: req.movement_sensor_name,
                configured: self.config.movement_sensor.clone(),
            });
        }

        info!(
            "new location to go to: {} cfg: {:?}",
            req.destination, req.parameters
        );

        let parameters = self.config.fix_motion_parameters(req.parameters);
        let execution_id = {
            // lifecycle stays locked across the check and the submit
            let lifecycle = self.lifecycle();
            if !lifecycle.is_active() {
                return Err(MotionError::Closed);
            }
            self.store
                .submit(&self.config.base, req.destination, parameters)
        };
        info!("plan {} in progress", execution_id);
        Ok(execution_id)
    }

    /// Clear the active plan and stop the base
    ///
    /// Fails with [`MotionError::Closed`] once the service is closed; the
    /// control loop has sent the final stop by then.
    pub async fn stop_plan(&self, req: StopPlanRequest) -> Result<(), MotionError> {
        self.check_base_name(&req.component_name)?;

        // close finalizes before the loop's final stop, which needs the gate
        let _gate = self.command_gate.lock().await;
        if !self.lifecycle().is_active() {
            return Err(MotionError::Closed);
        }
        if let Some(execution_id) = self.store.stop() {
            info!("plan {} stopped", execution_id);
        }
        self.base.stop().await
    }

    /// Report the current plan status, if there is one
    pub fn list_plan_statuses(
        &self,
        req: ListPlanStatusesRequest,
    ) -> Result<Vec<PlanStatus>, MotionError> {
        let Some(status) = self.store.status() else {
            return Ok(Vec::new());
        };
        if req.only_active_plans && status.state != PlanState::InProgress {
            return Ok(Vec::new());
        }
        Ok(vec![status])
    }

    /// Map-based navigation is not offered
    pub fn move_on_map(
        &self,
        _component_name: &str,
        _slam_service_name: &str,
    ) -> Result<ExecutionId, MotionError> {
        Err(MotionError::unsupported("MoveOnMap"))
    }

    /// Frame-relative moves are not offered
    pub fn move_component(
        &self,
        _component_name: &str,
        _destination_frame: &str,
    ) -> Result<bool, MotionError> {
        Err(MotionError::unsupported("Move"))
    }

    pub fn get_pose(
        &self,
        _component_name: &str,
        _destination_frame: &str,
    ) -> Result<GeoPoint, MotionError> {
        Err(MotionError::unsupported("GetPose"))
    }

    /// Only the latest status is kept, so there is no history to report
    pub fn plan_history(&self, _component_name: &str) -> Result<Vec<PlanStatus>, MotionError> {
        Err(MotionError::unsupported("PlanHistory"))
    }

    pub fn do_command(&self, _command: &str) -> Result<String, MotionError> {
        Err(MotionError::unsupported("DoCommand"))
    }

    /// Stop the control loop; returns after the base was sent its final stop
    ///
    /// Calling `close` again is a no-op.
    pub async fn close(&self) -> Result<(), MotionError> {
        let handle = {
            let mut lifecycle = self.lifecycle();
            if lifecycle.get_state() == State::Finalized {
                return Ok(());
            }
            lifecycle.transition(State::Finalized)?;
            self.control_loop
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
        };

        info!("{} close called", self.name);
        if let Some(handle) = handle {
            handle.shutdown().await;
        }
        Ok(())
    }
}
