//! Pin driver seam.
//!
//! How pins are multiplexed is the driver's business; the entities above
//! only need export, direction and level operations.

use crate::error::{GpioError, Result};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Logic level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Pin level driver.
pub trait PinDriver: Send + Sync {
    /// Make the pin available and configure it as an output.
    fn export_output(&self, pin: u32) -> Result<()>;

    /// Drive the pin to a level.
    fn write(&self, pin: u32, level: Level) -> Result<()>;

    /// Read the pin's current level.
    fn read(&self, pin: u32) -> Result<Level>;
}

/// Sysfs GPIO driver (`/sys/class/gpio`).
pub struct SysfsPins {
    root: PathBuf,
}

impl SysfsPins {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/sys/class/gpio"),
        }
    }

    /// Driver rooted somewhere else than `/sys/class/gpio`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn write_node(&self, pin: u32, node: &str, value: &str) -> Result<()> {
        let path = self.root.join(format!("gpio{}", pin)).join(node);
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|source| GpioError::Pin { pin, source })?;
        file.write_all(value.as_bytes())
            .map_err(|source| GpioError::Pin { pin, source })
    }
}

impl Default for SysfsPins {
    fn default() -> Self {
        Self::new()
    }
}

impl PinDriver for SysfsPins {
    fn export_output(&self, pin: u32) -> Result<()> {
        let export = self.root.join("export");
        // Re-exporting an already exported pin reports EBUSY; that is fine.
        if let Err(source) = std::fs::write(&export, pin.to_string()) {
            if source.kind() != std::io::ErrorKind::ResourceBusy {
                return Err(GpioError::Pin { pin, source });
            }
        }
        self.write_node(pin, "direction", "out")
    }

    fn write(&self, pin: u32, level: Level) -> Result<()> {
        self.write_node(pin, "value", if level == Level::High { "1" } else { "0" })
    }

    fn read(&self, pin: u32) -> Result<Level> {
        let path = self.root.join(format!("gpio{}", pin)).join("value");
        let text = std::fs::read_to_string(&path)
            .map_err(|source| GpioError::Pin { pin, source })?;
        Ok(if text.trim() == "0" {
            Level::Low
        } else {
            Level::High
        })
    }
}

/// In-memory pin driver for tests and bench setups without hardware.
#[derive(Default)]
pub struct MemoryPins {
    levels: Mutex<HashMap<u32, Level>>,
}

impl MemoryPins {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PinDriver for MemoryPins {
    fn export_output(&self, pin: u32) -> Result<()> {
        self.levels.lock().unwrap().entry(pin).or_insert(Level::Low);
        Ok(())
    }

    fn write(&self, pin: u32, level: Level) -> Result<()> {
        self.levels.lock().unwrap().insert(pin, level);
        Ok(())
    }

    fn read(&self, pin: u32) -> Result<Level> {
        Ok(self
            .levels
            .lock()
            .unwrap()
            .get(&pin)
            .copied()
            .unwrap_or(Level::Low))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_pins_roundtrip() {
        let pins = MemoryPins::new();
        pins.export_output(17).unwrap();
        assert_eq!(pins.read(17).unwrap(), Level::Low);
        pins.write(17, Level::High).unwrap();
        assert_eq!(pins.read(17).unwrap(), Level::High);
    }

    #[test]
    fn test_sysfs_pins_missing_root() {
        let pins = SysfsPins::with_root("/nonexistent/gpio");
        assert!(pins.export_output(17).is_err());
    }
}
