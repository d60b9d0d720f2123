//! Background Tasks Module
//!
//! Maintenance tasks that run against the item cache's record store.
//!
//! # Tasks
//! - Clean: expires records untouched for longer than the record lifetime
//! - Sync: refreshes cached payloads through a caller supplied callback
//! - Compaction: one-shot, debounced removal of stale ledger touches

mod clean;
mod compaction;
mod sync;

pub use clean::spawn_clean_task;
pub use compaction::spawn_compaction_task;
pub use sync::{spawn_sync_task, sync_fn, sync_once, SyncFn, SyncFuture, SyncReport};
