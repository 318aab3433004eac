//! Relay station - the append-only relay collection.
//!
//! Populated once during configuration load; indices are stable for the
//! process lifetime and are the keys dashboard actions address relays by.

use crate::error::{GpioError, Result};
use crate::relay::Relay;
use std::sync::{Arc, RwLock};

/// Ordered collection of relays.
#[derive(Default)]
pub struct RelayStation {
    relays: RwLock<Vec<Arc<Relay>>>,
}

impl RelayStation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a relay; it gets the next sequential index.
    pub fn push(&self, relay: Relay) {
        self.relays.write().unwrap().push(Arc::new(relay));
    }

    /// Relay at `index`.
    pub fn get(&self, index: usize) -> Result<Arc<Relay>> {
        let relays = self.relays.read().unwrap();
        relays
            .get(index)
            .cloned()
            .ok_or(GpioError::IndexOutOfRange {
                index,
                size: relays.len(),
            })
    }

    /// Number of relays.
    pub fn size(&self) -> usize {
        self.relays.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Snapshot of the relays in index order.
    pub fn snapshot(&self) -> Vec<Arc<Relay>> {
        self.relays.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::RelayState;

    #[test]
    fn test_push_assigns_sequential_indices() {
        let station = RelayStation::new();
        station.push(Relay::new(17, "Pumpe"));
        station.push(Relay::new(27, "Licht"));

        assert_eq!(station.size(), 2);
        assert_eq!(station.get(0).unwrap().name, "Pumpe");
        assert_eq!(station.get(1).unwrap().name, "Licht");
    }

    #[test]
    fn test_get_out_of_range() {
        let station = RelayStation::new();
        station.push(Relay::new(17, "Pumpe"));
        assert!(matches!(
            station.get(1),
            Err(GpioError::IndexOutOfRange { index: 1, size: 1 })
        ));
    }

    #[test]
    fn test_switch_changes_only_that_index() {
        let station = RelayStation::new();
        station.push(Relay::new(17, "Pumpe"));
        station.push(Relay::new(27, "Licht"));

        station.get(1).unwrap().switch(RelayState::Up);

        assert!(station.get(0).unwrap().is_off());
        assert!(!station.get(1).unwrap().is_off());
    }
}
