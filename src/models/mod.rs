//! Request and Response models for the tiered store API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::RecordRequest;
pub use responses::{
    ClearResponse, DeleteResponse, HealthResponse, RecordResponse, RetrieveResponse,
    StatsResponse,
};
