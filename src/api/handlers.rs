//! API Handlers
//!
//! HTTP request handlers for each tiered store endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{Result, TierError};
use crate::models::{
    ClearResponse, DeleteResponse, HealthResponse, RecordRequest, RecordResponse,
    RetrieveResponse, StatsResponse,
};
use crate::store::{TierSnapshot, TieredStore};

/// Application state shared across all handlers.
///
/// The tiered store locks internally, so it is shared through a plain Arc.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TieredStore>,
}

impl AppState {
    /// Creates a new AppState around the given store.
    pub fn new(store: TieredStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Runs a store call on the blocking pool.
    ///
    /// Store calls wait on the coordinating lock and may do file I/O, so they
    /// never run on a runtime worker.
    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&TieredStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| TierError::Internal(format!("store task failed: {}", e)))?
    }
}

/// Handler for PUT /record
///
/// Stores a key-value pair, demoting older entries if the cache is full.
pub async fn record_handler(
    State(state): State<AppState>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<RecordResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(TierError::InvalidRequest(error_msg));
    }

    let RecordRequest { key, value } = req;
    let (key, cache_size) = state
        .run(move |store| {
            store.record(&key, &value)?;
            Ok((key, store.cache_size()))
        })
        .await?;

    Ok(Json(RecordResponse::new(key, cache_size)))
}

/// Handler for GET /retrieve/:key
///
/// Looks the key up in the cache tier, then the persistent tier.
pub async fn retrieve_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RetrieveResponse>> {
    let (key, value) = state
        .run(move |store| {
            let value = store.retrieve(&key)?;
            Ok((key, value))
        })
        .await?;

    match value {
        Some(value) => Ok(Json(RetrieveResponse::new(key, value))),
        None => Err(TierError::NotFound(key)),
    }
}

/// Handler for DELETE /delete/:key
///
/// Deletes a key from the cache tier.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let (key, deleted) = state
        .run(move |store| {
            let deleted = store.delete(&key);
            Ok((key, deleted))
        })
        .await?;

    if deleted {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(TierError::NotFound(key))
    }
}

/// Handler for DELETE /clear
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    state.run(|store| store.clear()).await?;
    Ok(Json(ClearResponse::cleared()))
}

/// Handler for GET /snapshot
///
/// Returns the contents of every tier as JSON.
pub async fn snapshot_handler(State(state): State<AppState>) -> Result<Json<TierSnapshot>> {
    Ok(Json(state.run(|store| store.snapshot()).await?))
}

/// Handler for GET /dump
///
/// Returns the contents of every tier as a plain-text listing.
pub async fn dump_handler(State(state): State<AppState>) -> Result<String> {
    state.run(|store| store.dump()).await
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let response = state
        .run(|store| {
            Ok(StatsResponse::new(
                store.policy_kind(),
                store.capacity(),
                store.stats(),
            ))
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
