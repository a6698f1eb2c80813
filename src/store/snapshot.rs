//! Point-in-time view of all three collaborators, for inspection and dumps.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::policy::{PolicyEntry, PolicyKind};

// == Tier Snapshot ==
#[derive(Debug, Clone, Serialize)]
pub struct TierSnapshot {
    pub policy: PolicyKind,
    pub capacity_bytes: usize,
    pub cache_size_bytes: usize,
    /// Cache tier contents, ordered by key
    pub cache: BTreeMap<String, String>,
    /// Tracked keys, next victim first
    pub eviction_order: Vec<PolicyEntry>,
    /// Persistent tier contents, ordered by key
    pub persistent: BTreeMap<String, String>,
}

impl fmt::Display for TierSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Cache({}/{} bytes, {}) contents:",
            self.cache_size_bytes, self.capacity_bytes, self.policy
        )?;
        if self.cache.is_empty() {
            writeln!(f, "Cache is empty")?;
        }
        for (key, value) in &self.cache {
            writeln!(f, "{}:{}", key, value)?;
        }

        writeln!(f, "Policy contents:")?;
        if self.eviction_order.is_empty() {
            writeln!(f, "Policy is empty")?;
        }
        for entry in &self.eviction_order {
            writeln!(f, "{}", entry)?;
        }

        writeln!(f, "Persistent contents:")?;
        if self.persistent.is_empty() {
            writeln!(f, "Persistent tier is empty")?;
        }
        for (key, value) in &self.persistent {
            writeln!(f, "{}:{}", key, value)?;
        }
        Ok(())
    }
}
