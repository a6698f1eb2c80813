//! Tiered KV - A size-bounded key-value cache fronting a persistent store
//!
//! Entries that no longer fit the cache's byte budget are demoted to the
//! persistent tier by a FIFO, LRU or LFU eviction policy, and promoted back
//! when they are read again.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod persistent;
pub mod policy;
pub mod store;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, TierError};
pub use policy::PolicyKind;
pub use store::TieredStore;
