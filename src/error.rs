//! Error types for the tiered store
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Tier Error Enum ==
/// Unified error type for the tiered store and its HTTP front end.
///
/// A missing key is not an error for the store itself (`retrieve` returns
/// `None`, `delete` returns `false`); `NotFound` only exists so the HTTP layer
/// can answer with a 404.
#[derive(Error, Debug)]
pub enum TierError {
    /// Key not found in either tier
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The persistent tier failed to perform an I/O operation
    #[error("Persistent store failure: {0}")]
    Persistence(#[from] std::io::Error),

    /// A record in the persistent tier could not be decoded
    #[error("Corrupt persistent record: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Cache, policy and persistent tier disagree
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for TierError {
    fn into_response(self) -> Response {
        let status = match &self {
            TierError::NotFound(_) => StatusCode::NOT_FOUND,
            TierError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TierError::Persistence(_) | TierError::Corrupt(_) => StatusCode::SERVICE_UNAVAILABLE,
            TierError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the tiered store.
pub type Result<T> = std::result::Result<T, TierError>;
