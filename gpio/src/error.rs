//! Error types for GPIO entities.

use thiserror::Error;

/// GPIO errors.
#[derive(Error, Debug)]
pub enum GpioError {
    /// Entity index outside the collection.
    #[error("Index out of range: {index} (size {size})")]
    IndexOutOfRange { index: usize, size: usize },

    /// Unknown relay state token in a dashboard action.
    #[error("Unknown relay state token: {0}")]
    UnknownStateToken(String),

    /// Pin driver failure.
    #[error("Pin {pin}: {source}")]
    Pin {
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    /// Display row outside the panel geometry.
    #[error("Display row out of range: {row} (rows {rows})")]
    DisplayRow { row: usize, rows: usize },

    /// The service was started twice.
    #[error("Service already started: {0}")]
    AlreadyStarted(&'static str),
}

/// Result type alias for GPIO operations.
pub type Result<T> = std::result::Result<T, GpioError>;
