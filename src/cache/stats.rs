//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses, evictions, expirations and sync outcomes.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of lookups for ids not in the cache
    pub misses: u64,
    /// Number of writes (inserts and overwrites)
    pub writes: u64,
    /// Number of records evicted due to capacity pressure
    pub evictions: u64,
    /// Number of records removed by the age-based clean
    pub expirations: u64,
    /// Number of completed ledger compactions
    pub compactions: u64,
    /// Number of records refreshed by sync
    pub sync_refreshes: u64,
    /// Number of failed sync refreshes
    pub sync_failures: u64,
    /// Current number of records in the cache
    pub total_entries: usize,
    /// Current number of ledger touches, live and stale
    pub ledger_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_compaction(&mut self) {
        self.compactions += 1;
    }

    pub fn record_sync_refresh(&mut self) {
        self.sync_refreshes += 1;
    }

    pub fn record_sync_failure(&mut self) {
        self.sync_failures += 1;
    }

    // == Update Sizes ==
    /// Updates the table and ledger sizes.
    pub fn set_sizes(&mut self, total_entries: usize, ledger_entries: usize) {
        self.total_entries = total_entries;
        self.ledger_entries = ledger_entries;
    }
}
