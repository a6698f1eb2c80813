//! Bounded Cache Module
//!
//! In-memory cache tier with live byte-size accounting.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

use crate::cache::entry::{accounted_size, overwrite_delta};

#[derive(Debug, Default)]
struct CacheInner {
    /// Key-value storage
    entries: HashMap<String, String>,
    /// Sum of `accounted_size` over all entries
    size_in_bytes: usize,
}

// == Bounded Cache ==
/// Key-value map whose aggregate size is maintained on every mutation.
///
/// The cache never enforces its own limit: deciding what to evict before a
/// write is the coordinator's job, using [`BoundedCache::pending_delta`].
/// Reads share the lock, mutations take it exclusively.
#[derive(Debug, Default)]
pub struct BoundedCache {
    inner: RwLock<CacheInner>,
}

impl BoundedCache {
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    // == Size ==
    /// Returns the current aggregate accounted size in bytes.
    pub fn size(&self) -> usize {
        self.inner.read().size_in_bytes
    }

    // == Pending Delta ==
    /// Returns how much `put(key, value)` would change the aggregate size.
    ///
    /// A new key costs its full accounted size; an existing key only
    /// changes by the difference between the old and new value lengths.
    pub fn pending_delta(&self, key: &str, value: &str) -> isize {
        let inner = self.inner.read();
        match inner.entries.get(key) {
            Some(existing) => overwrite_delta(existing, value),
            None => accounted_size(key, value) as isize,
        }
    }

    // == Put ==
    /// Inserts or overwrites an entry.
    ///
    /// Returns true if the key was newly created, false on overwrite.
    pub fn put(&self, key: &str, value: &str) -> bool {
        let mut guard = self.inner.write();
        let CacheInner {
            entries,
            size_in_bytes,
        } = &mut *guard;

        match entries.get_mut(key) {
            Some(existing) => {
                *size_in_bytes = *size_in_bytes - existing.len() + value.len();
                value.clone_into(existing);
                false
            }
            None => {
                *size_in_bytes += accounted_size(key, value);
                entries.insert(key.to_string(), value.to_string());
                true
            }
        }
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.read().entries.get(key).cloned()
    }

    // == Contains ==
    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().entries.contains_key(key)
    }

    // == Delete ==
    /// Removes an entry, returning whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        let mut guard = self.inner.write();
        match guard.entries.remove_entry(key) {
            Some((key, value)) => {
                guard.size_in_bytes -= accounted_size(&key, &value);
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Drops every entry and resets the aggregate size.
    pub fn clear(&self) {
        let mut guard = self.inner.write();
        guard.entries.clear();
        guard.size_in_bytes = 0;
    }

    // == Length ==
    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    // == Entries ==
    /// Returns a key-ordered copy of the cache contents.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.inner
            .read()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
