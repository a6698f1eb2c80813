//! API Routes
//!
//! Configures the Axum router with all tiered store endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, dump_handler, health_handler, record_handler,
    retrieve_handler, snapshot_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /record` - Store a key-value pair
/// - `GET /retrieve/:key` - Retrieve a value from either tier
/// - `DELETE /delete/:key` - Delete a key from the cache tier
/// - `DELETE /clear` - Empty every tier
/// - `GET /snapshot` - Tier contents as JSON
/// - `GET /dump` - Tier contents as text
/// - `GET /stats` - Tier statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/record", put(record_handler))
        .route("/retrieve/:key", get(retrieve_handler))
        .route("/delete/:key", delete(delete_handler))
        .route("/clear", delete(clear_handler))
        .route("/snapshot", get(snapshot_handler))
        .route("/dump", get(dump_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
