//! Cache Module
//!
//! Provides the size-bounded in-memory cache tier and its statistics.

mod bounded;
mod entry;
mod stats;

// Re-export public types
pub use bounded::BoundedCache;
pub use entry::accounted_size;
pub use stats::TierStats;
