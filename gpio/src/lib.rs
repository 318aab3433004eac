//! GPIO backed hardware entities.
//!
//! The pin level driver is a seam ([`pin::PinDriver`]): production uses the
//! sysfs driver, tests use the in-memory one. Everything above the seam is
//! plain Rust: relays with a desired state, the append-only relay station,
//! the strip service that applies desired state to pins, and the LCD
//! display.

pub mod display;
pub mod error;
pub mod pin;
pub mod relay;
pub mod station;
pub mod strip;

pub use display::{Display, LINE_GEOMETRY_2004};
pub use error::{GpioError, Result};
pub use pin::{Level, MemoryPins, PinDriver, SysfsPins};
pub use relay::{Relay, RelayState};
pub use station::RelayStation;
pub use strip::Strip;
