//! Settings file loading.

use crate::error::{ConfigError, Result};
use crate::settings::{RelayEntry, Settings, ThermaEntry};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loader for the settings file.
pub struct ConfigLoader {
    /// Path of the settings file.
    path: PathBuf,
    /// Whether a missing file yields default settings instead of an error.
    use_defaults: bool,
}

impl ConfigLoader {
    /// Create a loader for an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            use_defaults: false,
        }
    }

    /// Create a loader for the default system settings file.
    pub fn system() -> Self {
        Self::new(crate::defaults::SETTINGS_PATH)
    }

    /// Set whether a missing file yields default settings.
    pub fn use_defaults(mut self, use_defaults: bool) -> Self {
        self.use_defaults = use_defaults;
        self
    }

    /// Path this loader reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and decode the settings file.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            if self.use_defaults {
                debug!(path = ?self.path, "Settings file missing, using defaults");
                return Ok(Settings::default());
            }
            return Err(ConfigError::NotFound(self.path.clone()));
        }

        let text = std::fs::read_to_string(&self.path)?;
        let settings: Settings = toml::from_str(&text)?;

        debug!(
            path = ?self.path,
            relays = settings.gpio.relays.len(),
            therma = settings.gpio.therma.len(),
            "Loaded settings"
        );

        Ok(settings)
    }

    /// Load the settings file record by record.
    ///
    /// Decoding stops at the first malformed record; every record decoded
    /// before it is kept. The error that stopped the decode is returned
    /// alongside the partial settings so the caller can report it.
    pub fn load_partial(&self) -> (Settings, Option<ConfigError>) {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return (
                    Settings::default(),
                    Some(ConfigError::NotFound(self.path.clone())),
                );
            }
            Err(error) => return (Settings::default(), Some(error.into())),
        };

        let value: toml::Value = match text.parse() {
            Ok(value) => value,
            Err(error) => return (Settings::default(), Some(ConfigError::TomlParse(error))),
        };

        let mut settings = Settings::default();
        let gpio = value.get("gpio");

        let relays = gpio
            .and_then(|gpio| gpio.get("relays"))
            .and_then(toml::Value::as_array);
        for entry in relays.into_iter().flatten() {
            match entry.clone().try_into::<RelayEntry>() {
                Ok(entry) => settings.gpio.relays.push(entry),
                Err(error) => return (settings, Some(ConfigError::TomlParse(error))),
            }
        }

        let therma = gpio
            .and_then(|gpio| gpio.get("therma"))
            .and_then(toml::Value::as_array);
        for entry in therma.into_iter().flatten() {
            match entry.clone().try_into::<ThermaEntry>() {
                Ok(entry) => settings.gpio.therma.push(entry),
                Err(error) => return (settings, Some(ConfigError::TomlParse(error))),
            }
        }

        debug!(
            path = ?self.path,
            relays = settings.gpio.relays.len(),
            therma = settings.gpio.therma.len(),
            "Loaded settings record by record"
        );

        (settings, None)
    }
}
