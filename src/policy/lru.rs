//! LRU Policy Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::VecDeque;

use parking_lot::RwLock;

use super::{EvictionPolicy, PolicyEntry, PolicyKind};

// == LRU Policy ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug, Default)]
pub struct LruPolicy {
    /// Order of keys by access time
    order: RwLock<VecDeque<String>>,
}

impl LruPolicy {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EvictionPolicy for LruPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Lru
    }

    // == Record ==
    /// Adds a key at the most recently used end.
    fn on_record(&self, key: &str) {
        let mut order = self.order.write();
        order.retain(|k| k != key);
        order.push_front(key.to_string());
    }

    // == Access ==
    /// Moves a tracked key to the front. Untracked keys are ignored so an
    /// access never adds a key the cache does not hold.
    fn on_access(&self, key: &str) {
        let mut order = self.order.write();
        if let Some(pos) = order.iter().position(|k| k == key) {
            if let Some(k) = order.remove(pos) {
                order.push_front(k);
            }
        }
    }

    // == Delete ==
    fn on_delete(&self, key: &str) {
        self.order.write().retain(|k| k != key);
    }

    // == Select Victim ==
    /// Returns the least recently used key without removing it.
    fn select_victim(&self) -> Option<String> {
        self.order.read().back().cloned()
    }

    fn clear(&self) {
        self.order.write().clear();
    }

    fn len(&self) -> usize {
        self.order.read().len()
    }

    fn eviction_order(&self) -> Vec<PolicyEntry> {
        self.order.read().iter().rev().map(PolicyEntry::new).collect()
    }
}
