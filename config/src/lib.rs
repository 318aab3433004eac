//! Configuration crate for Servus.
//!
//! Holds the typed representation of the settings file
//! (`/etc/servus/servus.toml` by default) and the compiled defaults for
//! everything that is not meant to be edited in the field: port numbers,
//! buffer pool geometry, polling intervals.

pub mod defaults;
pub mod error;
pub mod loader;
pub mod settings;

pub use error::{ConfigError, Result};
pub use loader::ConfigLoader;
pub use settings::{GpioSection, RelayEntry, Settings, ThermaEntry};
