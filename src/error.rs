//! Error types for the outdoor motion service

use thiserror::Error;

/// Errors surfaced by the motion service and its collaborators
#[derive(Debug, Error)]
pub enum MotionError {
    /// The service configuration is incomplete or inconsistent
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The movement sensor cannot report something the controller needs
    #[error("movement sensor needs {0}")]
    MissingCapability(&'static str),

    /// A request named a component other than the configured one
    #[error("request had {kind} name {requested} but configured {configured}")]
    NameMismatch {
        kind: &'static str,
        requested: String,
        configured: String,
    },

    /// The operation is not offered by this service
    #[error("{operation} not supported by outdoor motion service")]
    Unsupported { operation: &'static str },

    /// The service has been closed
    #[error("outdoor motion service is closed")]
    Closed,

    /// A lifecycle transition that is not allowed from the current state
    #[error("invalid state transition: {0}")]
    InvalidState(String),

    /// A movement sensor read failed
    #[error("movement sensor error: {0}")]
    Sensor(String),

    /// A base command failed
    #[error("base error: {0}")]
    Actuator(String),
}

impl MotionError {
    /// Shorthand for an unsupported operation error
    pub fn unsupported(operation: &'static str) -> Self {
        MotionError::Unsupported { operation }
    }

    /// True for errors that only cost one control tick
    pub fn is_transient(&self) -> bool {
        matches!(self, MotionError::Sensor(_) | MotionError::Actuator(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_message_names_operation() {
        let err = MotionError::unsupported("MoveOnMap");
        assert_eq!(
            err.to_string(),
            "MoveOnMap not supported by outdoor motion service"
        );
    }

    #[test]
    fn name_mismatch_message() {
        let err = MotionError::NameMismatch {
            kind: "base",
            requested: "other".to_string(),
            configured: "rover".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request had base name other but configured rover"
        );
    }

    #[test]
    fn only_io_errors_are_transient() {
        assert!(MotionError::Sensor("gps".into()).is_transient());
        assert!(MotionError::Actuator("motor".into()).is_transient());
        assert!(!MotionError::Closed.is_transient());
        assert!(!MotionError::Config("x".into()).is_transient());
        assert!(!MotionError::InvalidState("x".into()).is_transient());
    }
}
