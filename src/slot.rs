//! Construct-once subsystem slots.
//!
//! Every subsystem the workspace owns lives in a [`Slot`]: empty at process
//! start, occupied exactly once during bootstrap, read-only afterwards. A
//! second construction attempt and a fetch on an empty slot both fail
//! loudly instead of silently handing out a fresh instance.

use crate::error::{Result, WorkspaceError};
use std::sync::{Arc, OnceLock};

/// Storage slot for one subsystem instance.
pub struct Slot<T> {
    name: &'static str,
    cell: OnceLock<Arc<T>>,
}

impl<T> Slot<T> {
    /// An empty slot. `name` identifies the subsystem in error messages.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceLock::new(),
        }
    }

    /// Occupy the slot. Fails if an instance already exists.
    pub fn init(&self, value: T) -> Result<Arc<T>> {
        let instance = Arc::new(value);
        self.cell
            .set(Arc::clone(&instance))
            .map_err(|_| WorkspaceError::AlreadyInitialized(self.name))?;
        Ok(instance)
    }

    /// The existing instance. Fails if the slot is still empty.
    pub fn shared(&self) -> Result<Arc<T>> {
        self.cell
            .get()
            .cloned()
            .ok_or(WorkspaceError::NotInitialized(self.name))
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_before_init_fails() {
        let slot: Slot<u32> = Slot::new("unit");
        assert!(matches!(
            slot.shared(),
            Err(WorkspaceError::NotInitialized("unit"))
        ));
    }

    #[test]
    fn test_init_twice_fails() {
        let slot: Slot<u32> = Slot::new("unit");
        slot.init(1).unwrap();
        assert!(matches!(
            slot.init(2),
            Err(WorkspaceError::AlreadyInitialized("unit"))
        ));
    }

    #[test]
    fn test_shared_returns_same_instance() {
        let slot: Slot<u32> = Slot::new("unit");
        let created = slot.init(7).unwrap();
        let first = slot.shared().unwrap();
        let second = slot.shared().unwrap();

        assert!(Arc::ptr_eq(&created, &first));
        assert!(Arc::ptr_eq(&first, &second));
    }
}
