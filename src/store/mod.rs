//! Tiered Store Module
//!
//! Coordinates the cache tier, the eviction policy and the persistent tier.

mod snapshot;
mod tiered;


pub use snapshot::TierSnapshot;
pub use tiered::TieredStore;
