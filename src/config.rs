//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::policy::PolicyKind;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Byte budget of the cache tier
    pub cache_capacity: usize,
    /// Eviction policy deciding which entry is demoted to the persistent tier
    pub eviction_policy: PolicyKind,
    /// File backing the persistent tier, None = keep it in memory
    pub storage_path: Option<PathBuf>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Cache byte budget (default: 1024)
    /// - `EVICTION_POLICY` - `fifo`, `lru` or `lfu` (default: lru)
    /// - `STORAGE_PATH` - Persistent tier file (default: in-memory)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_capacity),
            eviction_policy: env::var("EVICTION_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.eviction_policy),
            storage_path: env::var("STORAGE_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 1024,
            eviction_policy: PolicyKind::Lru,
            storage_path: None,
            server_port: 3000,
        }
    }
}
