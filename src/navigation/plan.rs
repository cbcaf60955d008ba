//! Plan state shared between the service facade and the control loop
//!
//! [`PlanStore`] holds at most one active plan and the status of the most
//! recent submission. Every access takes a single mutex for the duration of a
//! field copy or assignment only; callers never hold it across sensor or base
//! I/O.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MotionParameters;
use crate::common::types::GeoPoint;

/// Identifies one plan submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    pub fn new() -> Self {
        ExecutionId(Uuid::new_v4())
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanState {
    InProgress,
    Succeeded,
    Stopped,
}

/// Status of the most recently submitted plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStatus {
    pub execution_id: ExecutionId,
    /// Base the plan drives
    pub component_name: String,
    pub state: PlanState,
    pub timestamp: DateTime<Utc>,
    /// Last command issued, or why the plan ended
    pub reason: Option<String>,
}

/// The plan the control loop is currently driving toward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePlan {
    pub execution_id: ExecutionId,
    pub destination: GeoPoint,
    /// Fully defaulted; every field is strictly positive
    pub parameters: MotionParameters,
}

#[derive(Debug, Default)]
struct ServiceState {
    last_request: Option<ActivePlan>,
    current_status: Option<PlanStatus>,
}

/// Lock-guarded holder of the active plan and its status
#[derive(Debug, Default)]
pub struct PlanStore {
    inner: Mutex<ServiceState>,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ServiceState> {
        // Every critical section is a plain field copy, so a poisoned lock
        // still guards consistent data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace any active plan with a new one and return its id
    ///
    /// The previous plan, if any, is dropped without notice.
    pub fn submit(
        &self,
        component_name: &str,
        destination: GeoPoint,
        parameters: MotionParameters,
    ) -> ExecutionId {
        let execution_id = ExecutionId::new();
        let status = PlanStatus {
            execution_id,
            component_name: component_name.to_string(),
            state: PlanState::InProgress,
            timestamp: Utc::now(),
            reason: None,
        };

        let mut state = self.state();
        state.last_request = Some(ActivePlan {
            execution_id,
            destination,
            parameters,
        });
        state.current_status = Some(status);
        execution_id
    }

    /// Clear the active plan and mark the current status stopped
    ///
    /// Returns the id of the plan that was still in progress, if any.
    pub fn stop(&self) -> Option<ExecutionId> {
        let mut state = self.state();
        let stopped = state.last_request.take().map(|plan| plan.execution_id);
        if let Some(status) = state.current_status.as_mut() {
            status.state = PlanState::Stopped;
            status.timestamp = Utc::now();
        }
        stopped
    }

    /// Consistent copy of the active plan and the current status
    pub fn snapshot(&self) -> (Option<ActivePlan>, Option<PlanStatus>) {
        let state = self.state();
        (state.last_request, state.current_status.clone())
    }

    pub fn status(&self) -> Option<PlanStatus> {
        self.state().current_status.clone()
    }

    /// Record the command just computed for `execution_id`
    ///
    /// Returns false, changing nothing, if that plan is no longer active.
    pub fn record_progress(&self, execution_id: ExecutionId, reason: String) -> bool {
        let mut state = self.state();
        if !is_active(&state, execution_id) {
            return false;
        }
        if let Some(status) = state.current_status.as_mut() {
            status.reason = Some(reason);
            status.timestamp = Utc::now();
        }
        true
    }

    /// Mark `execution_id` as arrived and clear it
    ///
    /// Returns false, changing nothing, if that plan is no longer active.
    pub fn complete(&self, execution_id: ExecutionId, reason: String) -> bool {
        let mut state = self.state();
        if !is_active(&state, execution_id) {
            return false;
        }
        state.last_request = None;
        if let Some(status) = state.current_status.as_mut() {
            status.state = PlanState::Succeeded;
            status.reason = Some(reason);
            status.timestamp = Utc::now();
        }
        true
    }
}

fn is_active(state: &ServiceState, execution_id: ExecutionId) -> bool {
    state
        .last_request
        .map_or(false, |plan| plan.execution_id == execution_id)
}
