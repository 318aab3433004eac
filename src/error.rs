//! Error types for the control plane.

use crate::workspace::LifecycleState;
use thiserror::Error;

/// Control plane errors.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// A subsystem slot was initialized twice.
    #[error("Already initialized: {0}")]
    AlreadyInitialized(&'static str),

    /// A subsystem slot was read before being initialized.
    #[error("Not initialized: {0}")]
    NotInitialized(&'static str),

    /// A kernel stage was invoked out of order.
    #[error("Invalid kernel transition: {from} -> {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// GPIO error
    #[error("GPIO error: {0}")]
    Gpio(#[from] gpio::GpioError),

    /// Temperature sensing error
    #[error("Therma error: {0}")]
    Therma(#[from] therma::ThermaError),

    /// Buffer pool error
    #[error("Pool error: {0}")]
    Pool(#[from] pool::PoolError),

    /// Dashboard error
    #[error("WWW error: {0}")]
    Www(#[from] www::WwwError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for control plane operations.
pub type Result<T> = std::result::Result<T, WorkspaceError>;
