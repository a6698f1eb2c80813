//! LFU Policy Module
//!
//! Evicts the key with the fewest accesses since admission. Within one
//! frequency the key that reached it first goes first.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

use super::{EvictionPolicy, PolicyEntry, PolicyKind};

/// Position of a key: `(frequency, sequence)`.
///
/// `sequence` is taken from a monotonically increasing counter each time a key
/// enters a frequency tier, so ordering by the pair gives ascending frequency
/// and oldest-first within a tier.
type Rank = (u64, u64);

#[derive(Debug, Default)]
struct LfuInner {
    order: BTreeMap<Rank, String>,
    ranks: HashMap<String, Rank>,
    next_seq: u64,
}

impl LfuInner {
    fn place(&mut self, key: &str, frequency: u64) {
        let rank = (frequency, self.next_seq);
        self.next_seq += 1;
        self.order.insert(rank, key.to_string());
        self.ranks.insert(key.to_string(), rank);
    }
}

// == LFU Policy ==
#[derive(Debug, Default)]
pub struct LfuPolicy {
    inner: RwLock<LfuInner>,
}

impl LfuPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Access count of a tracked key.
    #[cfg(test)]
    fn frequency(&self, key: &str) -> Option<u64> {
        self.inner.read().ranks.get(key).map(|(frequency, _)| *frequency)
    }
}

impl EvictionPolicy for LfuPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Lfu
    }

    fn on_record(&self, key: &str) {
        let mut inner = self.inner.write();
        if !inner.ranks.contains_key(key) {
            inner.place(key, 0);
        }
    }

    fn on_access(&self, key: &str) {
        let mut inner = self.inner.write();
        if let Some((frequency, seq)) = inner.ranks.get(key).copied() {
            inner.order.remove(&(frequency, seq));
            inner.place(key, frequency + 1);
        }
    }

    fn on_delete(&self, key: &str) {
        let mut inner = self.inner.write();
        if let Some(rank) = inner.ranks.remove(key) {
            inner.order.remove(&rank);
        }
    }

    fn select_victim(&self) -> Option<String> {
        self.inner
            .read()
            .order
            .first_key_value()
            .map(|(_, key)| key.clone())
    }

    fn clear(&self) {
        let mut inner = self.inner.write();
        inner.order.clear();
        inner.ranks.clear();
    }

    fn len(&self) -> usize {
        self.inner.read().ranks.len()
    }

    fn eviction_order(&self) -> Vec<PolicyEntry> {
        self.inner
            .read()
            .order
            .iter()
            .map(|((frequency, _), key)| PolicyEntry::with_frequency(key.as_str(), *frequency))
            .collect()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn victims(lfu: &LfuPolicy) -> Vec<String> {
        lfu.eviction_order().into_iter().map(|e| e.key).collect()
    }

    #[test]
    fn test_lfu_new_keys_start_at_zero() {
        let lfu = LfuPolicy::new();
        lfu.on_record("a");
        assert_eq!(lfu.frequency("a"), Some(0));
        assert_eq!(lfu.frequency("b"), None);
    }

    #[test]
    fn test_lfu_ties_broken_by_admission_order() {
        let lfu = LfuPolicy::new();
        lfu.on_record("a");
        lfu.on_record("b");
        lfu.on_record("c");

        assert_eq!(victims(&lfu), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lfu_least_frequent_first() {
        let lfu = LfuPolicy::new();
        for key in ["111", "222", "333", "4"] {
            lfu.on_record(key);
        }
        lfu.on_access("111");
        lfu.on_access("111");
        lfu.on_access("222");
        lfu.on_access("222");
        lfu.on_access("333");

        assert_eq!(lfu.select_victim(), Some("4".to_string()));
        assert_eq!(victims(&lfu), vec!["4", "333", "111", "222"]);
        assert_eq!(lfu.frequency("222"), Some(2));
    }

    #[test]
    fn test_lfu_promoted_key_goes_behind_its_new_tier() {
        let lfu = LfuPolicy::new();
        lfu.on_record("a");
        lfu.on_record("b");

        // b reaches frequency 1 first, then a joins it
        lfu.on_access("b");
        lfu.on_access("a");

        assert_eq!(victims(&lfu), vec!["b", "a"]);
    }

    #[test]
    fn test_lfu_delete_and_rerecord_resets_frequency() {
        let lfu = LfuPolicy::new();
        lfu.on_record("a");
        lfu.on_record("b");
        lfu.on_access("a");
        lfu.on_access("a");

        lfu.on_delete("a");
        assert_eq!(lfu.len(), 1);
        assert_eq!(lfu.frequency("a"), None);

        lfu.on_record("a");
        assert_eq!(lfu.frequency("a"), Some(0));
        assert_eq!(victims(&lfu), vec!["b", "a"]);
    }

    #[test]
    fn test_lfu_access_untracked_key_is_ignored() {
        let lfu = LfuPolicy::new();
        lfu.on_access("ghost");
        assert!(lfu.is_empty());
        assert_eq!(lfu.select_victim(), None);
    }

    #[test]
    fn test_lfu_eviction_order_reports_frequencies() {
        let lfu = LfuPolicy::new();
        lfu.on_record("x");
        lfu.on_access("x");

        assert_eq!(lfu.eviction_order(), vec![PolicyEntry::with_frequency("x", 1)]);
    }

    #[test]
    fn test_lfu_clear() {
        let lfu = LfuPolicy::new();
        lfu.on_record("a");
        lfu.on_record("b");
        lfu.clear();
        assert!(lfu.is_empty());
        assert_eq!(lfu.select_victim(), None);
    }
}
