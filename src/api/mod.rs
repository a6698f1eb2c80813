//! API Module
//!
//! HTTP handlers and routing for the tiered store.
//!
//! # Endpoints
//! - `PUT /record` - Store a key-value pair
//! - `GET /retrieve/:key` - Retrieve a value from either tier
//! - `DELETE /delete/:key` - Delete a key from the cache tier
//! - `DELETE /clear` - Empty every tier
//! - `GET /snapshot` / `GET /dump` - Inspect tier contents
//! - `GET /stats` - Tier statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
