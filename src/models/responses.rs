//! Response DTOs for the tiered store API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::TierStats;
use crate::policy::PolicyKind;

/// Response body for the retrieve operation (GET /retrieve/:key)
#[derive(Debug, Clone, Serialize)]
pub struct RetrieveResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl RetrieveResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the record operation (PUT /record)
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    /// Success message
    pub message: String,
    /// The key that was recorded
    pub key: String,
    /// Cache tier size after the write
    pub cache_size_bytes: usize,
}

impl RecordResponse {
    pub fn new(key: impl Into<String>, cache_size_bytes: usize) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' recorded successfully", key),
            key,
            cache_size_bytes,
        }
    }
}

/// Response body for the delete operation (DELETE /delete/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted from cache tier", key),
            key,
        }
    }
}

/// Response body for the clear operation (DELETE /clear)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "All tiers cleared".to_string(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Active eviction policy
    pub policy: PolicyKind,
    /// Cache tier byte budget
    pub capacity_bytes: usize,
    #[serde(flatten)]
    pub stats: TierStats,
    /// Hit rate (hits / all retrievals)
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(policy: PolicyKind, capacity_bytes: usize, stats: TierStats) -> Self {
        Self {
            policy,
            capacity_bytes,
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
