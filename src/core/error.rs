//! Simulation errors

use thiserror::Error;

use super::event::Wake;
use super::types::{BufferId, SimTime};

/// Simulation result type
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised while wiring or running a simulation.
///
/// Everything except `UnexpectedWake` is detected before the first event
/// runs; a run that starts never degrades into one of these silently.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid delay {delay}: scheduling delays must be non-negative")]
    InvalidDelay { delay: SimTime },

    #[error("buffer '{name}' has invalid capacity {capacity}")]
    InvalidCapacity { name: String, capacity: i64 },

    #[error("missing configuration: {kind} '{name}' is not defined")]
    MissingConfiguration { kind: &'static str, name: String },

    #[error("invalid horizon {0}: must be a non-negative number")]
    InvalidHorizon(SimTime),

    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    #[error("{0} is not owned by this simulation")]
    UnknownBuffer(BufferId),

    #[error("invalid distribution for '{stream}': {reason}")]
    InvalidDistribution { stream: String, reason: String },

    #[error("process '{process}' cannot handle wake-up {wake}")]
    UnexpectedWake { process: String, wake: String },

    #[error("replication thread pool: {0}")]
    ThreadPool(String),
}

impl SimError {
    pub fn missing(kind: &'static str, name: impl Into<String>) -> Self {
        SimError::MissingConfiguration {
            kind,
            name: name.into(),
        }
    }

    pub fn unexpected_wake(process: &str, wake: &Wake) -> Self {
        SimError::UnexpectedWake {
            process: process.to_string(),
            wake: wake.to_string(),
        }
    }
}
