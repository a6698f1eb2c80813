//! Eviction Policy Module
//!
//! Decides which cached key is demoted to the persistent tier when the cache
//! runs out of budget. Three interchangeable variants are provided:
//!
//! - [`FifoPolicy`] - oldest inserted key first, accesses ignored
//! - [`LruPolicy`] - least recently used key first
//! - [`LfuPolicy`] - least frequently used key first, oldest within a frequency
//!
//! The variant is picked at runtime with a [`PolicyKind`] value.

mod fifo;
mod lfu;
mod lru;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use fifo::FifoPolicy;
pub use lfu::LfuPolicy;
pub use lru::LruPolicy;

// == Eviction Policy ==
/// Per-key bookkeeping able to name one eviction victim on demand.
///
/// Implementations guard their own state, so every method takes `&self`.
/// A key must be tracked exactly while it lives in the cache tier: the
/// coordinator calls `on_record` when a key is admitted and `on_delete` when
/// it leaves for any reason.
pub trait EvictionPolicy: fmt::Debug + Send + Sync {
    /// Which variant this is.
    fn kind(&self) -> PolicyKind;

    /// A key was newly admitted into the cache tier.
    fn on_record(&self, key: &str);

    /// A cached key was read or overwritten.
    fn on_access(&self, key: &str);

    /// A key left the cache tier; drops all bookkeeping for it.
    fn on_delete(&self, key: &str);

    /// Names the next key to evict without removing it.
    ///
    /// Returns `None` only when nothing is tracked.
    fn select_victim(&self) -> Option<String>;

    /// Drops all bookkeeping.
    fn clear(&self);

    /// Number of tracked keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tracked keys in eviction order, next victim first.
    fn eviction_order(&self) -> Vec<PolicyEntry>;
}

// == Policy Entry ==
/// One tracked key as reported by [`EvictionPolicy::eviction_order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyEntry {
    pub key: String,
    /// Access count since admission, only tracked by LFU
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u64>,
}

impl PolicyEntry {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            frequency: None,
        }
    }

    pub fn with_frequency(key: impl Into<String>, frequency: u64) -> Self {
        Self {
            key: key.into(),
            frequency: Some(frequency),
        }
    }
}

impl fmt::Display for PolicyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frequency {
            Some(frequency) => write!(f, "{}:{}", frequency, self.key),
            None => write!(f, "{}", self.key),
        }
    }
}

// == Policy Kind ==
/// Selects an eviction policy variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Fifo,
    Lru,
    Lfu,
}

impl PolicyKind {
    /// Creates an empty policy of this kind.
    pub fn build(self) -> Box<dyn EvictionPolicy> {
        match self {
            PolicyKind::Fifo => Box::new(FifoPolicy::new()),
            PolicyKind::Lru => Box::new(LruPolicy::new()),
            PolicyKind::Lfu => Box::new(LfuPolicy::new()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Fifo => "fifo",
            PolicyKind::Lru => "lru",
            PolicyKind::Lfu => "lfu",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(PolicyKind::Fifo),
            "lru" => Ok(PolicyKind::Lru),
            "lfu" => Ok(PolicyKind::Lfu),
            other => Err(format!("unknown eviction policy '{}'", other)),
        }
    }
}
