//! Key-value persistence.
//!
//! The substrate is an opaque string store ([`KeyValueStore`]); the
//! [`Persistence`] adapter layers JSON encoding and corruption tolerance on
//! top of it.

mod memory;
mod persistence;

pub use memory::MemoryStore;
pub use persistence::Persistence;

use crate::error::Result;

/// Trait for the local key-value substrate
///
/// Implementations must be write-or-fail: when `set` returns an error the
/// previously stored value for that key is still intact.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` if present
    fn remove(&mut self, key: &str) -> Result<()>;
}
