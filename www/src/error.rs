//! Error types for the web dashboard.

use thiserror::Error;

/// Dashboard errors.
#[derive(Error, Debug)]
pub enum WwwError {
    /// Template rendering failure.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// The service was started twice.
    #[error("Service already started: {0}")]
    AlreadyStarted(&'static str),

    /// The service was asked to wait or stop before being started.
    #[error("Service not started: {0}")]
    NotStarted(&'static str),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, WwwError>;
