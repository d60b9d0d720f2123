//! API Module
//!
//! HTTP handlers and routing for the product service.
//!
//! # Endpoints
//! - `GET /product/:id` - Fetch a product
//! - `PUT /product/:id` - Update a product
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
