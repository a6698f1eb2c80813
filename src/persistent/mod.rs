//! Persistent Tier Module
//!
//! Unbounded key-value storage that receives entries evicted from the cache
//! tier and hands them back on promotion.

mod file;
mod memory;

use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

// == Persistent Store ==
/// Durable collaborator of the tiered store.
///
/// `put` is an upsert with the same overwrite semantics as the cache tier.
/// Every call performs its I/O eagerly and reports failure through the
/// returned `Result`; nothing is buffered or retried.
pub trait PersistentStore: fmt::Debug + Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Removes `key`, returning whether it existed.
    fn delete(&self, key: &str) -> Result<bool>;

    /// Removes every entry.
    fn clear(&self) -> Result<()>;

    /// Returns a key-ordered copy of all stored entries.
    fn entries(&self) -> Result<BTreeMap<String, String>>;
}
