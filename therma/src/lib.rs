//! Temperature sensing.
//!
//! Sensors are read over MODBUS through the [`probe::TemperatureProbe`]
//! seam; the [`service::ThermaService`] owns the sensor collection and the
//! polling loop.

pub mod error;
pub mod probe;
pub mod sensor;
pub mod service;

pub use error::{Result, ThermaError};
pub use probe::{ModbusProbe, TemperatureProbe};
pub use sensor::{Sensor, Temperature};
pub use service::ThermaService;
