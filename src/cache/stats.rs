//! Tier Statistics Module
//!
//! Tracks hits, misses, promotions, and evictions across both tiers.

use serde::Serialize;

// == Tier Stats ==
/// Tiered store performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TierStats {
    /// Retrievals answered by the cache tier
    pub hits: u64,
    /// Retrievals that found the key in neither tier
    pub misses: u64,
    /// Retrievals answered by the persistent tier and promoted back
    pub promotions: u64,
    /// Entries demoted to the persistent tier by the admission loop
    pub evictions: u64,
    /// Current number of entries in the cache tier
    pub cache_entries: usize,
    /// Current accounted size of the cache tier in bytes
    pub cache_size_bytes: usize,
}

impl TierStats {
    // == Constructor ==
    /// Creates a new TierStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Fraction of retrievals served by the cache tier.
    ///
    /// Promotions count as requests that missed the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.promotions;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Update Cache Gauges ==
    /// Refreshes the cache-tier gauges from the live cache.
    pub fn set_cache_usage(&mut self, entries: usize, size_bytes: usize) {
        self.cache_entries = entries;
        self.cache_size_bytes = size_bytes;
    }
}
