//! Error types and handling
//!
//! This module contains error types and error handling for the simulation.
//!
//! Worker-local failures (a visitor supplier erroring out) are logged at the
//! worker boundary and stop that worker only; they are never propagated to
//! other workers or to the shared counter and queues.

use thiserror::Error;

use crate::types::ConfigValidationError;

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed; reported before any worker starts
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigValidationError),

    /// A visitor supplier failed; fatal to the calling arrival worker only
    #[error("Visitor source failed at door {door_name}: {source}")]
    VisitorSource {
        /// Door the failing worker was serving
        door_name: String,
        /// The underlying supplier error
        #[source]
        source: anyhow::Error,
    },

    /// A worker thread panicked; observed at join time by the orchestrator
    #[error("Worker thread '{0}' panicked")]
    WorkerPanicked(String),

    /// Serialization error from report export
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error, e.g. a worker thread failing to spawn
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    /// Create a visitor source error
    pub fn visitor_source(door_name: impl Into<String>, source: anyhow::Error) -> Self {
        Self::VisitorSource { door_name: door_name.into(), source }
    }

    /// Check if this error leaves the rest of the simulation live
    ///
    /// Configuration errors abort before startup; a supplier failure stops
    /// one worker while the others continue.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::Configuration(_) => false,
            SimulationError::VisitorSource { .. } => true,
            SimulationError::WorkerPanicked(_) => false,
            SimulationError::Serialization(_) => true,
            SimulationError::Io(_) => false,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::Configuration(_) => "Configuration",
            SimulationError::VisitorSource { .. } => "Visitor Source",
            SimulationError::WorkerPanicked(_) => "Worker",
            SimulationError::Serialization(_) => "Serialization",
            SimulationError::Io(_) => "IO",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_is_fatal() {
        let error = SimulationError::from(ConfigValidationError::NonPositiveCapacity(0));
        assert!(!error.is_recoverable());
        assert_eq!(error.category(), "Configuration");
        assert!(error.to_string().contains("capacity"));
    }

    #[test]
    fn test_visitor_source_error_is_recoverable() {
        let error =
            SimulationError::visitor_source("EAST", anyhow::anyhow!("supplier exhausted"));
        assert!(error.is_recoverable());
        assert_eq!(error.category(), "Visitor Source");
        assert!(error.to_string().contains("EAST"));
        assert!(error.to_string().contains("supplier exhausted"));
    }

    #[test]
    fn test_worker_panic_is_fatal() {
        let error = SimulationError::WorkerPanicked("admission-EAST".to_string());
        assert!(!error.is_recoverable());
        assert_eq!(error.category(), "Worker");
    }
}
