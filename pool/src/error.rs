//! Error types for buffer pool operations.

use thiserror::Error;

/// Buffer pool errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// A bank with this id already exists.
    #[error("Bank already exists: id {0}")]
    DuplicateBank(u32),

    /// No bank with this id.
    #[error("Bank not found: id {0}")]
    BankNotFound(u32),

    /// The pool has no room for another bank.
    #[error("Pool is full: capacity {0} banks")]
    PoolFull(usize),

    /// The bank's memory was already materialized.
    #[error("Bank already allocated: id {0}")]
    AlreadyAllocated(u32),

    /// All buffers of the bank are currently in use.
    #[error("Bank exhausted: id {0}")]
    BankExhausted(u32),

    /// Bank parameters that can never work.
    #[error("Invalid bank parameters: {0}")]
    InvalidBank(String),
}

/// Result type alias for buffer pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
