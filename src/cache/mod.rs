//! Cache Module
//!
//! Bounded record cache with recency eviction, age-based cleaning and
//! background refresh.

use std::sync::Arc;

use tokio::sync::Mutex;

mod entry;
mod item_cache;
mod ledger;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, Clock, Record, RecordId, Touch};
pub use item_cache::ItemCache;
pub use ledger::{LedgerEntry, TouchLedger};
pub use stats::CacheStats;
pub use store::RecordStore;

/// Record store shared between the cache and its background tasks.
///
/// `None` once the cache has been shut down.
pub type SharedStore<R> = Arc<Mutex<Option<RecordStore<R>>>>;
