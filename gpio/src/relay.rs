//! Relay entity.

use crate::error::GpioError;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

/// Target state token used in dashboard actions
/// (`?SwitchRelay=<index>&RelayState=<Up|Down>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Relay energized ("Ein").
    Up,
    /// Relay released ("Aus").
    Down,
}

impl FromStr for RelayState {
    type Err = GpioError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "Up" => Ok(RelayState::Up),
            "Down" => Ok(RelayState::Down),
            other => Err(GpioError::UnknownStateToken(other.to_string())),
        }
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayState::Up => write!(f, "Up"),
            RelayState::Down => write!(f, "Down"),
        }
    }
}

/// One relay, wired to a GPIO pin.
///
/// Holds the desired state; the strip service applies it to the pin.
pub struct Relay {
    /// Human readable name shown on the dashboard.
    pub name: String,
    /// GPIO pin number of the relay coil.
    pub pin: u32,
    off: AtomicBool,
}

impl Relay {
    /// Relays come up released.
    pub fn new(pin: u32, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pin,
            off: AtomicBool::new(true),
        }
    }

    /// Whether the relay is currently released.
    pub fn is_off(&self) -> bool {
        self.off.load(Ordering::Acquire)
    }

    /// Set the desired state.
    pub fn switch(&self, state: RelayState) {
        self.off.store(state == RelayState::Down, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_starts_off() {
        let relay = Relay::new(17, "Pumpe");
        assert!(relay.is_off());
    }

    #[test]
    fn test_relay_switch() {
        let relay = Relay::new(17, "Pumpe");
        relay.switch(RelayState::Up);
        assert!(!relay.is_off());
        relay.switch(RelayState::Down);
        assert!(relay.is_off());
    }

    #[test]
    fn test_state_token_parse() {
        assert_eq!("Up".parse::<RelayState>().unwrap(), RelayState::Up);
        assert_eq!("Down".parse::<RelayState>().unwrap(), RelayState::Down);
        assert!("Sideways".parse::<RelayState>().is_err());
    }
}
