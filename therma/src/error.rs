//! Error types for temperature sensing.

use thiserror::Error;

/// Temperature sensing errors.
#[derive(Error, Debug)]
pub enum ThermaError {
    /// Sensor index outside the collection.
    #[error("Index out of range: {index} (size {size})")]
    IndexOutOfRange { index: usize, size: usize },

    /// Probe transport failure.
    #[error("Probe error: {0}")]
    Probe(String),

    /// Response frame the probe could not make sense of.
    #[error("Malformed probe response: {0}")]
    MalformedResponse(String),

    /// The service was started twice.
    #[error("Service already started: {0}")]
    AlreadyStarted(&'static str),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for temperature sensing operations.
pub type Result<T> = std::result::Result<T, ThermaError>;
