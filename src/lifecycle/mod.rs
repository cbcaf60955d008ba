//! Lifecycle tracking for long-running service components

use tracing::debug;

use crate::error::MotionError;

/// State of a service component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed, background work not started yet
    Unconfigured,
    /// Background work running, accepting requests
    Active,
    /// Closed; terminal
    Finalized,
}

/// Named lifecycle state with checked transitions
#[derive(Debug)]
pub struct Lifecycle {
    pub name: String,
    state: State,
}

impl Lifecycle {
    pub fn new(name: &str) -> Self {
        Lifecycle {
            name: name.to_string(),
            state: State::Unconfigured,
        }
    }

    pub fn get_state(&self) -> State {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }

    /// Move to `next` if the transition is allowed
    ///
    /// Allowed: Unconfigured -> Active, Unconfigured -> Finalized,
    /// Active -> Finalized.
    pub fn transition(&mut self, next: State) -> Result<(), MotionError> {
        let allowed = matches!(
            (self.state, next),
            (State::Unconfigured, State::Active)
                | (State::Unconfigured, State::Finalized)
                | (State::Active, State::Finalized)
        );
        if !allowed {
            return Err(MotionError::InvalidState(format!(
                "{}: {:?} -> {:?}",
                self.name, self.state, next
            )));
        }
        debug!("{}: {:?} -> {:?}", self.name, self.state, next);
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unconfigured() {
        let lc = Lifecycle::new("svc");
        assert_eq!(lc.get_state(), State::Unconfigured);
        assert!(!lc.is_active());
    }

    #[test]
    fn active_cannot_restart() {
        let mut lc = Lifecycle::new("svc");
        lc.transition(State::Active).unwrap();
        assert!(matches!(
            lc.transition(State::Active),
            Err(MotionError::InvalidState(_))
        ));
        assert!(lc.is_active());
    }

    #[test]
    fn normal_lifecycle() {
        let mut lc = Lifecycle::new("svc");
        lc.transition(State::Active).unwrap();
        assert!(lc.is_active());
        lc.transition(State::Finalized).unwrap();
        assert_eq!(lc.get_state(), State::Finalized);
    }

    #[test]
    fn finalized_is_terminal() {
        let mut lc = Lifecycle::new("svc");
        lc.transition(State::Finalized).unwrap();
        let err = lc.transition(State::Active).unwrap_err();
        assert!(matches!(err, MotionError::InvalidState(_)));
        assert_eq!(
            err.to_string(),
            "invalid state transition: svc: Finalized -> Active"
        );
        assert!(matches!(
            lc.transition(State::Finalized),
            Err(MotionError::InvalidState(_))
        ));
    }
}
