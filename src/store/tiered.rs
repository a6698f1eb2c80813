//! Tiered Store
//!
//! Main engine combining the bounded cache tier, an eviction policy and an
//! unbounded persistent tier.

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{BoundedCache, TierStats};
use crate::config::Config;
use crate::error::{Result, TierError};
use crate::persistent::{FileStore, MemoryStore, PersistentStore};
use crate::policy::{EvictionPolicy, PolicyKind};
use crate::store::TierSnapshot;

// == Tiered Store ==
/// Size-bounded cache in front of an unbounded persistent store.
///
/// Writes that would push the cache past its byte budget first demote
/// victims chosen by the eviction policy to the persistent tier. Reads that
/// miss the cache promote the entry back from the persistent tier.
///
/// Each collaborator carries its own lock. Whole operations are additionally
/// serialized by `gate`, so the cache and the policy always change together
/// and a victim named by the policy is always present in the cache.
#[derive(Debug)]
pub struct TieredStore {
    /// Byte budget of the cache tier
    capacity: usize,
    cache: BoundedCache,
    policy: Box<dyn EvictionPolicy>,
    persistent: Box<dyn PersistentStore>,
    /// Coordinating lock; also owns the counters
    gate: Mutex<TierStats>,
}

impl TieredStore {
    // == Constructors ==
    /// Creates a store backed by an in-memory persistent tier.
    ///
    /// # Arguments
    /// * `capacity` - Byte budget of the cache tier
    /// * `kind` - Eviction policy, fixed for the store's lifetime
    pub fn new(capacity: usize, kind: PolicyKind) -> Self {
        Self::with_persistent(capacity, kind, Box::new(MemoryStore::new()))
    }

    /// Creates a store on top of the given persistent tier.
    pub fn with_persistent(
        capacity: usize,
        kind: PolicyKind,
        persistent: Box<dyn PersistentStore>,
    ) -> Self {
        Self {
            capacity,
            cache: BoundedCache::new(),
            policy: kind.build(),
            persistent,
            gate: Mutex::new(TierStats::new()),
        }
    }

    /// Creates a store from configuration, opening the storage file if one
    /// is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let persistent: Box<dyn PersistentStore> = match &config.storage_path {
            Some(path) => Box::new(FileStore::open(path)?),
            None => Box::new(MemoryStore::new()),
        };
        Ok(Self::with_persistent(
            config.cache_capacity,
            config.eviction_policy,
            persistent,
        ))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    // == Record ==
    /// Stores a key-value pair in the cache tier, demoting victims to the
    /// persistent tier until it fits.
    ///
    /// A single entry larger than the whole budget empties the cache and is
    /// then stored anyway.
    pub fn record(&self, key: &str, value: &str) -> Result<()> {
        let mut stats = self.gate.lock();
        let was_cached = self.cache.contains(key);

        self.admit(&mut stats, key, value)?;

        // A new write supersedes any demoted copy of the key
        if !was_cached {
            self.release_persistent_copy(key)?;
        }
        Ok(())
    }

    // == Retrieve ==
    /// Returns the value stored under `key` in either tier.
    ///
    /// A value found only in the persistent tier is moved back into the cache,
    /// which may demote other entries.
    pub fn retrieve(&self, key: &str) -> Result<Option<String>> {
        let mut stats = self.gate.lock();

        if let Some(value) = self.cache.get(key) {
            self.policy.on_access(key);
            stats.record_hit();
            return Ok(Some(value));
        }

        match self.persistent.get(key)? {
            Some(value) => {
                // The persistent copy stays until the cache holds the value
                self.admit(&mut stats, key, &value)?;
                self.release_persistent_copy(key)?;
                stats.record_promotion();
                debug!(key, "promoted from persistent tier");
                Ok(Some(value))
            }
            None => {
                stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Delete ==
    /// Removes a key from the cache tier.
    ///
    /// Keys that live only in the persistent tier are not touched; retrieve
    /// them first to make them deletable.
    pub fn delete(&self, key: &str) -> bool {
        let _gate = self.gate.lock();
        if self.cache.delete(key) {
            self.policy.on_delete(key);
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Empties all three collaborators together.
    pub fn clear(&self) -> Result<()> {
        let _gate = self.gate.lock();
        self.cache.clear();
        self.policy.clear();
        self.persistent.clear()?;
        info!("Cleared cache, policy and persistent tiers");
        Ok(())
    }

    // == Inspection ==
    /// Returns the current accounted size of the cache tier in bytes.
    pub fn cache_size(&self) -> usize {
        self.cache.size()
    }

    /// Reads the cache tier without counting as an access.
    pub fn peek_cache(&self, key: &str) -> Option<String> {
        self.cache.get(key)
    }

    /// Reads the persistent tier without promoting.
    pub fn peek_persistent(&self, key: &str) -> Result<Option<String>> {
        self.persistent.get(key)
    }

    /// Returns counters plus current cache usage.
    pub fn stats(&self) -> TierStats {
        let mut stats = self.gate.lock().clone();
        stats.set_cache_usage(self.cache.len(), self.cache.size());
        stats
    }

    /// Captures the contents of every tier at one consistent point.
    pub fn snapshot(&self) -> Result<TierSnapshot> {
        let _gate = self.gate.lock();
        Ok(TierSnapshot {
            policy: self.policy.kind(),
            capacity_bytes: self.capacity,
            cache_size_bytes: self.cache.size(),
            cache: self.cache.entries(),
            eviction_order: self.policy.eviction_order(),
            persistent: self.persistent.entries()?,
        })
    }

    /// Renders [`TieredStore::snapshot`] as a textual listing.
    pub fn dump(&self) -> Result<String> {
        Ok(self.snapshot()?.to_string())
    }

    // == Admission ==
    /// Makes room for `key` and writes it. Caller holds the gate.
    fn admit(&self, stats: &mut TierStats, key: &str, value: &str) -> Result<()> {
        // Delta is recomputed every round: evicting `key` itself turns an
        // overwrite into a fresh insert
        while self.cache.size() as isize + self.cache.pending_delta(key, value)
            > self.capacity as isize
        {
            let Some(victim) = self.policy.select_victim() else {
                break;
            };
            self.evict(&victim, key)?;
            stats.record_eviction();
        }

        if self.cache.put(key, value) {
            self.policy.on_record(key);
        } else {
            self.policy.on_access(key);
        }
        Ok(())
    }

    /// Drops the persistent copy of a key that was just admitted.
    ///
    /// If the delete fails the admission is undone, so the key is left in
    /// the persistent tier only.
    fn release_persistent_copy(&self, key: &str) -> Result<()> {
        match self.persistent.delete(key) {
            Ok(true) => {
                debug!(key, "dropped persistent copy");
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => {
                warn!(key, error = %e, "failed to drop persistent copy");
                self.cache.delete(key);
                self.policy.on_delete(key);
                Err(e)
            }
        }
    }

    /// Moves `victim` from the cache tier to the persistent tier.
    ///
    /// When the victim is the key being written its old value is dropped
    /// instead, so the key never lands in both tiers.
    fn evict(&self, victim: &str, incoming: &str) -> Result<()> {
        let value = self.cache.get(victim).ok_or_else(|| {
            TierError::Internal(format!(
                "eviction victim '{}' is tracked by the policy but not cached",
                victim
            ))
        })?;

        if victim != incoming {
            self.persistent.put(victim, &value).map_err(|e| {
                warn!(key = victim, error = %e, "failed to demote entry");
                e
            })?;
        }

        self.cache.delete(victim);
        self.policy.on_delete(victim);
        debug!(key = victim, size = self.cache.size(), "evicted from cache tier");
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::accounted_size;
    use std::collections::BTreeMap;

    fn prefilled(kind: PolicyKind) -> TieredStore {
        let store = TieredStore::new(20, kind);
        store.record("111", "aaa").unwrap();
        store.record("222", "bbb").unwrap();
        store.record("333", "ccc").unwrap();
        store.record("4", "d").unwrap();
        assert_eq!(store.cache_size(), 20);
        store
    }

    fn cached_keys(store: &TieredStore) -> Vec<String> {
        store.snapshot().unwrap().cache.into_keys().collect()
    }

    fn persistent(store: &TieredStore) -> BTreeMap<String, String> {
        store.snapshot().unwrap().persistent
    }

    fn pairs(items: &[(&str, &str)]) -> BTreeMap<String, String> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_record_and_retrieve() {
        let store = TieredStore::new(100, PolicyKind::Lru);
        store.record("key1", "value1").unwrap();

        assert_eq!(store.retrieve("key1").unwrap(), Some("value1".to_string()));
        assert_eq!(store.cache_size(), 10);
    }

    #[test]
    fn test_retrieve_missing() {
        let store = TieredStore::new(100, PolicyKind::Lru);
        assert_eq!(store.retrieve("nonexistent").unwrap(), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_fifo_eviction_scenario() {
        let store = prefilled(PolicyKind::Fifo);
        // Reads do not protect keys under FIFO
        store.retrieve("111").unwrap();

        store.record("666", "evil").unwrap();

        assert_eq!(store.peek_cache("666"), Some("evil".to_string()));
        assert_eq!(cached_keys(&store), vec!["333", "4", "666"]);
        assert_eq!(persistent(&store), pairs(&[("111", "aaa"), ("222", "bbb")]));
        assert_eq!(store.cache_size(), 15);
    }

    #[test]
    fn test_lru_eviction_scenario() {
        let store = prefilled(PolicyKind::Lru);
        store.retrieve("111").unwrap();

        store.record("666", "evil").unwrap();

        assert_eq!(cached_keys(&store), vec!["111", "4", "666"]);
        assert_eq!(persistent(&store), pairs(&[("222", "bbb"), ("333", "ccc")]));
    }

    #[test]
    fn test_lfu_eviction_scenario() {
        let store = prefilled(PolicyKind::Lfu);
        store.retrieve("111").unwrap();
        store.retrieve("111").unwrap();
        store.retrieve("222").unwrap();
        store.retrieve("222").unwrap();
        store.retrieve("333").unwrap();

        store.record("666", "evil").unwrap();

        assert_eq!(store.peek_cache("666"), Some("evil".to_string()));
        assert_eq!(cached_keys(&store), vec!["111", "222", "666"]);
        assert_eq!(persistent(&store), pairs(&[("333", "ccc"), ("4", "d")]));
    }

    #[test]
    fn test_overwrite_counts_as_access_for_lru() {
        let store = prefilled(PolicyKind::Lru);
        store.record("111", "zzz").unwrap();

        store.record("666", "evil").unwrap();

        assert_eq!(store.peek_cache("111"), Some("zzz".to_string()));
        assert_eq!(persistent(&store), pairs(&[("222", "bbb"), ("333", "ccc")]));
    }

    #[test]
    fn test_promotion_from_persistent_tier() {
        let persistent_tier = MemoryStore::new();
        persistent_tier.put("111", "aaa").unwrap();
        let store = TieredStore::with_persistent(20, PolicyKind::Fifo, Box::new(persistent_tier));
        assert_eq!(store.cache_size(), 0);

        assert_eq!(store.retrieve("111").unwrap(), Some("aaa".to_string()));

        assert_eq!(store.peek_cache("111"), Some("aaa".to_string()));
        assert_eq!(store.peek_persistent("111").unwrap(), None);
        assert_eq!(store.stats().promotions, 1);
    }

    #[test]
    fn test_promotion_can_evict_others() {
        let store = prefilled(PolicyKind::Fifo);
        store.record("666", "evil").unwrap();

        // 111 lives in the persistent tier now; pulling it back demotes 333
        assert_eq!(store.retrieve("111").unwrap(), Some("aaa".to_string()));

        assert_eq!(cached_keys(&store), vec!["111", "4", "666"]);
        assert_eq!(persistent(&store), pairs(&[("222", "bbb"), ("333", "ccc")]));
    }

    #[test]
    fn test_delete_only_targets_cache_tier() {
        let store = prefilled(PolicyKind::Fifo);
        store.record("666", "evil").unwrap();

        assert!(store.delete("333"));
        assert_eq!(store.peek_cache("333"), None);
        assert_eq!(store.cache_size(), 9);

        // 111 is only in the persistent tier
        assert!(!store.delete("111"));
        assert_eq!(store.peek_persistent("111").unwrap(), Some("aaa".to_string()));
    }

    #[test]
    fn test_delete_missing_changes_nothing() {
        let store = prefilled(PolicyKind::Lru);
        let before = store.dump().unwrap();

        assert!(!store.delete("nope"));

        assert_eq!(store.dump().unwrap(), before);
    }

    #[test]
    fn test_oversized_entry_empties_cache() {
        let store = prefilled(PolicyKind::Lru);
        let big = "x".repeat(30);

        store.record("big", &big).unwrap();

        assert_eq!(cached_keys(&store), vec!["big"]);
        assert_eq!(store.cache_size(), accounted_size("big", &big));
        assert_eq!(persistent(&store).len(), 4);
    }

    #[test]
    fn test_growing_overwrite_never_duplicates_key_across_tiers() {
        let store = TieredStore::new(8, PolicyKind::Fifo);
        store.record("a", "1234").unwrap();

        // The only cached key is the one being grown past the budget; its old
        // value is dropped rather than demoted
        store.record("a", "123456789").unwrap();

        assert_eq!(store.peek_cache("a"), Some("123456789".to_string()));
        assert_eq!(store.peek_persistent("a").unwrap(), None);
        assert_eq!(store.cache_size(), 10);
    }

    #[test]
    fn test_record_supersedes_persistent_copy() {
        let store = prefilled(PolicyKind::Fifo);
        store.record("666", "evil").unwrap();
        assert_eq!(store.peek_persistent("111").unwrap(), Some("aaa".to_string()));

        store.record("111", "new").unwrap();

        assert_eq!(store.peek_persistent("111").unwrap(), None);
        assert_eq!(store.retrieve("111").unwrap(), Some("new".to_string()));
    }

    #[test]
    fn test_clear_empties_every_tier() {
        let store = prefilled(PolicyKind::Lfu);
        store.record("666", "evil").unwrap();

        store.clear().unwrap();

        let snapshot = store.snapshot().unwrap();
        assert!(snapshot.cache.is_empty());
        assert!(snapshot.eviction_order.is_empty());
        assert!(snapshot.persistent.is_empty());
        assert_eq!(store.cache_size(), 0);
    }

    #[test]
    fn test_stats_track_tier_activity() {
        let store = prefilled(PolicyKind::Fifo);
        store.record("666", "evil").unwrap();
        store.retrieve("333").unwrap();
        store.retrieve("111").unwrap();
        store.retrieve("missing").unwrap();

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.promotions, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 3);
        assert_eq!(stats.cache_size_bytes, store.cache_size());
    }

    #[test]
    fn test_dump_lists_all_tiers() {
        let store = prefilled(PolicyKind::Lru);
        store.record("666", "evil").unwrap();

        let dump = store.dump().unwrap();
        assert!(dump.starts_with("Cache(15/20 bytes, lru) contents:\n"));
        assert!(dump.contains("666:evil\n"));
        assert!(dump.contains("Policy contents:\n333\n4\n666\n"));
        assert!(dump.ends_with("Persistent contents:\n111:aaa\n222:bbb\n"));
    }

    #[test]
    fn test_from_config_with_storage_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            cache_capacity: 20,
            eviction_policy: PolicyKind::Fifo,
            storage_path: Some(dir.path().join("tier.jsonl")),
            server_port: 0,
        };
        let store = TieredStore::from_config(&config).unwrap();
        assert_eq!(store.capacity(), 20);
        assert_eq!(store.policy_kind(), PolicyKind::Fifo);

        store.record("111", "aaa").unwrap();
        store.record("222", "bbb").unwrap();
        store.record("333", "ccc").unwrap();
        store.record("4", "d").unwrap();
        store.record("666", "evil").unwrap();

        assert_eq!(store.peek_persistent("111").unwrap(), Some("aaa".to_string()));
        assert_eq!(store.retrieve("222").unwrap(), Some("bbb".to_string()));
        assert_eq!(store.peek_persistent("222").unwrap(), None);
    }
}
