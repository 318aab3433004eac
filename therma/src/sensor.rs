//! Sensor entity.

use std::sync::RwLock;

/// Temperature reading with running extremes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub current: f64,
    pub lowest: f64,
    pub highest: f64,
}

impl Temperature {
    fn first(value: f64) -> Self {
        Self {
            current: value,
            lowest: value,
            highest: value,
        }
    }

    fn record(&mut self, value: f64) {
        self.current = value;
        if value < self.lowest {
            self.lowest = value;
        }
        if value > self.highest {
            self.highest = value;
        }
    }
}

/// One temperature sensor, addressed by a MODBUS unit id.
pub struct Sensor {
    /// Sensor hardware id.
    pub id: String,
    /// Human readable name shown on the dashboard.
    pub name: String,
    /// MODBUS unit identifier.
    pub unit_id: u8,
    temperature: RwLock<Option<Temperature>>,
}

impl Sensor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_id: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_id,
            temperature: RwLock::new(None),
        }
    }

    /// Record one reading, updating the running lowest/highest.
    pub fn record(&self, value: f64) {
        let mut temperature = self.temperature.write().unwrap();
        match temperature.as_mut() {
            Some(temperature) => temperature.record(value),
            None => *temperature = Some(Temperature::first(value)),
        }
    }

    /// Latest reading, `None` until the first poll succeeds.
    pub fn temperature(&self) -> Option<Temperature> {
        *self.temperature.read().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_has_no_reading_initially() {
        let sensor = Sensor::new("28-0000066ff1b1", "Keller", 2);
        assert!(sensor.temperature().is_none());
    }

    #[test]
    fn test_record_tracks_extremes() {
        let sensor = Sensor::new("28-0000066ff1b1", "Keller", 2);
        sensor.record(18.5);
        sensor.record(17.0);
        sensor.record(21.25);
        sensor.record(19.0);

        let temperature = sensor.temperature().unwrap();
        assert_eq!(temperature.current, 19.0);
        assert_eq!(temperature.lowest, 17.0);
        assert_eq!(temperature.highest, 21.25);
    }
}
