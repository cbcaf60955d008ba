//! Control loop driving the base toward the active plan's destination
pub mod base;
pub mod controllers;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use self::base::Base;
use self::controllers::{compute_velocity, SteeringGains};
use crate::common::types::VelocityCommand;
use crate::error::MotionError;
use crate::navigation::plan::{ExecutionId, PlanStore};
use crate::perception::MovementSensor;

/// Serializes commands sent to the base
///
/// Held across a plan check and the base call that follows it, so a stop
/// request can never be overtaken by a velocity command for the plan it just
/// cleared. Never held together with the plan store lock.
///
/// A tick keeps the gate for the duration of its base call, so a slow base
/// delays `stop_plan` and `close` until that call returns. Submitting and
/// listing plans never touch the gate.
pub type CommandGate = Arc<AsyncMutex<()>>;

/// What a single control tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No active plan
    Idle,
    /// Velocity command sent to the base
    Driving(VelocityCommand),
    /// Destination reached, plan marked succeeded and base stopped
    Arrived(ExecutionId),
    /// The plan changed while this tick was computing; nothing sent
    Superseded,
}

/// Periodic controller polling the movement sensor and commanding the base
pub struct ControlLoop {
    store: Arc<PlanStore>,
    base: Arc<dyn Base>,
    movement_sensor: Arc<dyn MovementSensor>,
    command_gate: CommandGate,
    gains: SteeringGains,
    tick_interval: Duration,
}

impl ControlLoop {
    pub fn new(
        store: Arc<PlanStore>,
        base: Arc<dyn Base>,
        movement_sensor: Arc<dyn MovementSensor>,
        command_gate: CommandGate,
        gains: SteeringGains,
        tick_interval: Duration,
    ) -> Self {
        ControlLoop {
            store,
            base,
            movement_sensor,
            command_gate,
            gains,
            tick_interval,
        }
    }

    /// Start the loop on the current tokio runtime
    pub fn spawn(self) -> ControlLoopHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        ControlLoopHandle { shutdown_tx, task }
    }

    /// Tick until `shutdown` fires (or its sender is dropped), then stop the base once
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        warn!("control tick skipped: {}", e);
                    }
                }
            }
        }

        info!("control loop shutting down, stopping base");
        let _gate = self.command_gate.lock().await;
        if let Err(e) = self.base.stop().await {
            error!("can't stop base: {}", e);
        }
    }

    /// Run one control step
    ///
    /// Sensor and base errors are returned without touching the plan state.
    pub async fn tick(&self) -> Result<TickOutcome, MotionError> {
        let pos = self.movement_sensor.position().await?;
        let heading = self.movement_sensor.compass_heading().await?;
        debug!("current pos: {} heading: {:.2}", pos, heading);

        let (plan, _) = self.store.snapshot();
        let Some(plan) = plan else {
            return Ok(TickOutcome::Idle);
        };

        let cmd = compute_velocity(pos, plan.destination, heading, &plan.parameters, &self.gains);
        let reason = format!(
            "setting linear: {:.2} mm/sec {:.2} kmh angular: {:.2} degs / sec",
            cmd.linear.y,
            cmd.linear_kmh(),
            cmd.angular.z
        );
        debug!("{}", reason);

        let _gate = self.command_gate.lock().await;

        if cmd.is_zero() {
            let reason = format!("reached destination {}", plan.destination);
            if !self.store.complete(plan.execution_id, reason) {
                return Ok(TickOutcome::Superseded);
            }
            info!(
                "plan {} reached destination {}, stopping base",
                plan.execution_id, plan.destination
            );
            self.base.stop().await?;
            return Ok(TickOutcome::Arrived(plan.execution_id));
        }

        if !self.store.record_progress(plan.execution_id, reason) {
            return Ok(TickOutcome::Superseded);
        }
        self.base.set_velocity(cmd.linear, cmd.angular).await?;
        Ok(TickOutcome::Driving(cmd))
    }
}

/// Owner of a running control loop
pub struct ControlLoopHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ControlLoopHandle {
    /// Signal the loop to stop and wait until it has issued its final stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!("control loop task failed: {}", e);
        }
    }
}
