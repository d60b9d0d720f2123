//! Request and Response models for the product API
//!
//! This module defines the product record payload and the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod record;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use record::{Price, ProductRecord};
pub use requests::UpdateProductRequest;
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
