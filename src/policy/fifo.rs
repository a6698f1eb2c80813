//! FIFO Policy Module
//!
//! Evicts keys in the order they were admitted, ignoring accesses.

use std::collections::VecDeque;

use parking_lot::RwLock;

use super::{EvictionPolicy, PolicyEntry, PolicyKind};

// == FIFO Policy ==
/// Keys are stored in a VecDeque where:
/// - Front = Oldest admitted (next victim)
/// - Back = Most recently admitted
#[derive(Debug, Default)]
pub struct FifoPolicy {
    order: RwLock<VecDeque<String>>,
}

impl FifoPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EvictionPolicy for FifoPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Fifo
    }

    fn on_record(&self, key: &str) {
        let mut order = self.order.write();
        if !order.iter().any(|k| k == key) {
            order.push_back(key.to_string());
        }
    }

    // Insertion order is all that matters
    fn on_access(&self, _key: &str) {}

    fn on_delete(&self, key: &str) {
        self.order.write().retain(|k| k != key);
    }

    fn select_victim(&self) -> Option<String> {
        self.order.read().front().cloned()
    }

    fn clear(&self) {
        self.order.write().clear();
    }

    fn len(&self) -> usize {
        self.order.read().len()
    }

    fn eviction_order(&self) -> Vec<PolicyEntry> {
        self.order.read().iter().map(PolicyEntry::new).collect()
    }
}
