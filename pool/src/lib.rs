//! Fixed capacity buffer pool.
//!
//! The controller must never hit the allocator while serving requests, so
//! all transfer buffers are reserved before the network service accepts its
//! first connection. Provisioning is a strict three step sequence, each
//! step fatal to startup on failure:
//!
//! 1. [`Pool::new`] creates the pool with a fixed bank capacity,
//! 2. [`Pool::init_bank`] registers a bank of homogeneous buffers,
//! 3. [`Pool::allocate_immediately`] materializes the bank's memory.
//!
//! After that, [`Pool::acquire`] hands out pre-allocated buffers. A bank
//! with a nonzero ceiling may grow past `buffer_count` up to the ceiling;
//! beyond that, running dry is a bounded [`PoolError::BankExhausted`]
//! condition, not an allocator failure.

pub mod error;

pub use error::{PoolError, Result};

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Parameters of one bank.
#[derive(Debug, Clone)]
pub struct BankConfig {
    /// Size of one buffer in bytes.
    pub buffer_size: usize,
    /// Bank flags, carried for the transport layer; the pool itself does
    /// not interpret them.
    pub flags: u32,
    /// Number of buffers in the bank.
    pub buffer_count: usize,
    /// Upper bound the bank may ever grow to; 0 means fixed at
    /// `buffer_count`.
    pub ceiling: usize,
}

struct Bank {
    id: u32,
    config: BankConfig,
    allocated: bool,
    /// Buffers materialized so far, free or on loan.
    created: usize,
    free: Vec<Box<[u8]>>,
}

/// A buffer pool holding up to a fixed number of banks.
pub struct Pool {
    bank_capacity: usize,
    banks: Arc<Mutex<Vec<Bank>>>,
}

impl Pool {
    /// Create a pool that will hold up to `bank_capacity` banks.
    pub fn new(bank_capacity: usize) -> Self {
        Self {
            bank_capacity,
            banks: Arc::new(Mutex::new(Vec::with_capacity(bank_capacity))),
        }
    }

    /// Register a bank. The bank's memory is not touched yet; call
    /// [`Pool::allocate_immediately`] to materialize it.
    pub fn init_bank(&self, id: u32, config: BankConfig) -> Result<()> {
        if config.buffer_size == 0 || config.buffer_count == 0 {
            return Err(PoolError::InvalidBank(format!(
                "bank {} has zero buffer size or count",
                id
            )));
        }

        let mut banks = self.banks.lock().unwrap();

        if banks.iter().any(|bank| bank.id == id) {
            return Err(PoolError::DuplicateBank(id));
        }
        if banks.len() >= self.bank_capacity {
            return Err(PoolError::PoolFull(self.bank_capacity));
        }

        debug!(
            bank = id,
            buffer_size = config.buffer_size,
            buffer_count = config.buffer_count,
            "Bank registered"
        );

        banks.push(Bank {
            id,
            config,
            allocated: false,
            created: 0,
            free: Vec::new(),
        });

        Ok(())
    }

    /// Materialize the bank's memory now instead of on first use.
    ///
    /// Valid exactly once per bank.
    pub fn allocate_immediately(&self, id: u32) -> Result<()> {
        let mut banks = self.banks.lock().unwrap();
        let bank = banks
            .iter_mut()
            .find(|bank| bank.id == id)
            .ok_or(PoolError::BankNotFound(id))?;

        if bank.allocated {
            return Err(PoolError::AlreadyAllocated(id));
        }

        let mut free = Vec::with_capacity(bank.config.buffer_count);
        for _ in 0..bank.config.buffer_count {
            free.push(vec![0u8; bank.config.buffer_size].into_boxed_slice());
        }

        bank.free = free;
        bank.created = bank.config.buffer_count;
        bank.allocated = true;

        debug!(
            bank = id,
            bytes = bank.config.buffer_count * bank.config.buffer_size,
            "Bank memory materialized"
        );

        Ok(())
    }

    /// Take one buffer from the bank; it returns when the handle is
    /// dropped. Out of the pre-allocated set, the bank grows one buffer at
    /// a time up to its ceiling; past that, [`PoolError::BankExhausted`].
    pub fn acquire(&self, id: u32) -> Result<PooledBuffer> {
        let mut banks = self.banks.lock().unwrap();
        let bank = banks
            .iter_mut()
            .find(|bank| bank.id == id)
            .ok_or(PoolError::BankNotFound(id))?;

        if !bank.allocated {
            return Err(PoolError::BankNotFound(id));
        }

        let data = match bank.free.pop() {
            Some(data) => data,
            None if bank.created < bank.config.ceiling => {
                bank.created += 1;
                debug!(bank = id, created = bank.created, "Bank grown");
                vec![0u8; bank.config.buffer_size].into_boxed_slice()
            }
            None => return Err(PoolError::BankExhausted(id)),
        };

        Ok(PooledBuffer {
            banks: Arc::clone(&self.banks),
            bank: id,
            data: Some(data),
            used: 0,
        })
    }

    /// Number of free buffers currently sitting in the bank.
    pub fn available(&self, id: u32) -> Result<usize> {
        let banks = self.banks.lock().unwrap();
        banks
            .iter()
            .find(|bank| bank.id == id)
            .map(|bank| bank.free.len())
            .ok_or(PoolError::BankNotFound(id))
    }
}

/// One buffer on loan from a bank.
///
/// Dereferences to the buffer's bytes; [`PooledBuffer::set_used`] records
/// how much of it carries payload.
pub struct PooledBuffer {
    banks: Arc<Mutex<Vec<Bank>>>,
    bank: u32,
    data: Option<Box<[u8]>>,
    used: usize,
}

impl PooledBuffer {
    /// Number of payload bytes recorded in the buffer.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Record how many leading bytes carry payload.
    pub fn set_used(&mut self, used: usize) {
        self.used = used.min(self.capacity());
    }

    /// Total buffer size in bytes.
    pub fn capacity(&self) -> usize {
        self.data.as_ref().map(|data| data.len()).unwrap_or(0)
    }

    /// The payload part of the buffer.
    pub fn payload(&self) -> &[u8] {
        &self[..self.used]
    }
}

impl Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.data.as_deref().unwrap_or(&[])
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(data) = self.data.take() {
            let mut banks = self.banks.lock().unwrap();
            if let Some(bank) = banks.iter_mut().find(|bank| bank.id == self.bank) {
                bank.free.push(data);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_config() -> BankConfig {
        BankConfig {
            buffer_size: 1024,
            flags: 0,
            buffer_count: 1000,
            ceiling: 0,
        }
    }

    #[test]
    fn test_provisioning_sequence() {
        let pool = Pool::new(1);
        pool.init_bank(0, bank_config()).unwrap();
        pool.allocate_immediately(0).unwrap();
        assert_eq!(pool.available(0).unwrap(), 1000);
    }

    #[test]
    fn test_duplicate_bank_id_fails() {
        let pool = Pool::new(2);
        pool.init_bank(0, bank_config()).unwrap();
        assert_eq!(
            pool.init_bank(0, bank_config()),
            Err(PoolError::DuplicateBank(0))
        );
    }

    #[test]
    fn test_allocate_immediately_once() {
        let pool = Pool::new(1);
        pool.init_bank(0, bank_config()).unwrap();
        pool.allocate_immediately(0).unwrap();
        assert_eq!(
            pool.allocate_immediately(0),
            Err(PoolError::AlreadyAllocated(0))
        );
    }

    #[test]
    fn test_pool_full() {
        let pool = Pool::new(1);
        pool.init_bank(0, bank_config()).unwrap();
        assert_eq!(pool.init_bank(1, bank_config()), Err(PoolError::PoolFull(1)));
    }

    #[test]
    fn test_acquire_and_release() {
        let pool = Pool::new(1);
        pool.init_bank(
            0,
            BankConfig {
                buffer_size: 16,
                flags: 0,
                buffer_count: 2,
                ceiling: 0,
            },
        )
        .unwrap();
        pool.allocate_immediately(0).unwrap();

        {
            let mut first = pool.acquire(0).unwrap();
            let _second = pool.acquire(0).unwrap();
            assert!(matches!(
                pool.acquire(0),
                Err(PoolError::BankExhausted(0))
            ));

            first[..5].copy_from_slice(b"hello");
            first.set_used(5);
            assert_eq!(first.payload(), b"hello");
        }

        // Both handles dropped, buffers are back.
        assert_eq!(pool.available(0).unwrap(), 2);
    }

    #[test]
    fn test_ceiling_allows_bounded_growth() {
        let pool = Pool::new(1);
        pool.init_bank(
            0,
            BankConfig {
                buffer_size: 16,
                flags: 0,
                buffer_count: 1,
                ceiling: 2,
            },
        )
        .unwrap();
        pool.allocate_immediately(0).unwrap();

        let _first = pool.acquire(0).unwrap();
        let _second = pool.acquire(0).unwrap();
        assert!(matches!(pool.acquire(0), Err(PoolError::BankExhausted(0))));
    }

    #[test]
    fn test_acquire_before_allocation_fails() {
        let pool = Pool::new(1);
        pool.init_bank(0, bank_config()).unwrap();
        assert!(pool.acquire(0).is_err());
    }

    #[test]
    fn test_zero_sized_bank_rejected() {
        let pool = Pool::new(1);
        let result = pool.init_bank(
            0,
            BankConfig {
                buffer_size: 0,
                flags: 0,
                buffer_count: 10,
                ceiling: 0,
            },
        );
        assert!(matches!(result, Err(PoolError::InvalidBank(_))));
    }
}
