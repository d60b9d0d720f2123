//! Item Cache - A bounded, time-aware write-through cache for product records
//!
//! Keeps the most recently touched records in memory, evicts by capacity and
//! age, and periodically refreshes cached records from their source.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::ItemCache;
pub use config::{CacheConfig, Config};
pub use error::{CacheError, Result};
