//! Record Store Module
//!
//! Record table plus touch ledger, with capacity eviction, age eviction and
//! ledger compaction. Every operation takes the current time explicitly; the
//! async [`ItemCache`](crate::cache::ItemCache) feeds it from its clock.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheStats, Record, RecordId, Touch, TouchLedger};

// == Record Store ==
/// Record table and touch ledger kept in step with each other.
///
/// The set of ids with a live ledger touch always equals the set of ids in
/// the table. The ledger may additionally hold stale touches.
#[derive(Debug)]
pub struct RecordStore<R> {
    /// Current state, keyed by record id
    entries: HashMap<RecordId, CacheEntry<R>>,
    /// Recency index over `entries`
    ledger: TouchLedger,
    /// Activity counters
    stats: CacheStats,
    /// Capacity; 0 keeps nothing
    max_items: usize,
    /// Age after which an untouched record is expired by `clean_at`
    record_lifetime_ms: u64,
    /// Last issued touch
    last_touch: Touch,
}

impl<R: Record> RecordStore<R> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_items` - Maximum number of records held
    /// * `record_lifetime_ms` - Age at which untouched records expire
    pub fn new(max_items: usize, record_lifetime_ms: u64) -> Self {
        Self {
            entries: HashMap::new(),
            ledger: TouchLedger::new(),
            stats: CacheStats::new(),
            max_items,
            record_lifetime_ms,
            last_touch: Touch { at: 0, seq: 0 },
        }
    }

    // == Stamp ==
    /// Issues the next touch stamp, never earlier than the previous one.
    fn stamp(&mut self, now_ms: u64) -> Touch {
        self.last_touch = Touch {
            at: now_ms.max(self.last_touch.at),
            seq: self.last_touch.seq + 1,
        };
        self.last_touch
    }

    // == Write ==
    /// Inserts or overwrites the record, then evicts down to capacity.
    ///
    /// On overwrite the previous ledger touch is dropped immediately.
    /// Returns the number of records evicted.
    pub fn write_at(&mut self, record: R, now_ms: u64) -> usize {
        let id = record.id();
        let touched = self.stamp(now_ms);

        if let Some(existing) = self.entries.get(&id) {
            self.ledger.remove(id, existing.touched);
        }

        self.ledger.push(id, touched);
        self.entries.insert(
            id,
            CacheEntry {
                touched,
                revision: touched.seq,
                record,
            },
        );
        self.stats.record_write();

        let surplus = self.entries.len().saturating_sub(self.max_items);
        let evicted = if surplus > 0 {
            self.evict_oldest(surplus)
        } else {
            0
        };
        self.stats.record_evictions(evicted);
        self.refresh_sizes();

        evicted
    }

    // == Get ==
    /// Returns the record for `id` and marks it as touched.
    ///
    /// The superseded ledger touch is left in place as a stale entry; see
    /// [`needs_compaction`](Self::needs_compaction).
    pub fn get_at(&mut self, id: RecordId, now_ms: u64) -> Option<R> {
        if !self.entries.contains_key(&id) {
            self.stats.record_miss();
            return None;
        }

        let touched = self.stamp(now_ms);
        let entry = self.entries.get_mut(&id)?;
        entry.touched = touched;
        let record = entry.record.clone();

        self.ledger.push(id, touched);
        self.stats.record_hit();
        self.refresh_sizes();

        Some(record)
    }

    // == Needs Compaction ==
    /// True once the ledger holds more than twice the capacity in touches.
    pub fn needs_compaction(&self) -> bool {
        self.ledger.len() > self.max_items.saturating_mul(2)
    }

    // == Evict Oldest ==
    /// Removes up to `count` of the least recently touched records.
    ///
    /// Stale ledger heads are discarded without counting toward `count`.
    /// Stops early if the ledger runs dry. Returns the number removed.
    pub fn evict_oldest(&mut self, count: usize) -> usize {
        let mut removed = 0;
        while removed < count {
            match self.pop_head() {
                Some(true) => removed += 1,
                Some(false) => {}
                None => break,
            }
        }
        removed
    }

    // == Clean ==
    /// Removes every record whose last touch is at or before
    /// `now_ms - record_lifetime_ms`.
    ///
    /// Only ledger heads inside the expiry window are popped, so records
    /// touched within the window are never removed. Returns the number of
    /// records expired.
    pub fn clean_at(&mut self, now_ms: u64) -> usize {
        let Some(threshold) = now_ms.checked_sub(self.record_lifetime_ms) else {
            return 0;
        };

        let mut expired = 0;
        while self
            .ledger
            .peek_oldest()
            .is_some_and(|head| head.touched.at <= threshold)
        {
            if let Some(true) = self.pop_head() {
                expired += 1;
            }
        }

        self.stats.record_expirations(expired);
        self.refresh_sizes();
        expired
    }

    // == Pop Head ==
    /// Pops the oldest ledger touch and removes its record if it is live.
    ///
    /// Returns `Some(true)` for a removed record, `Some(false)` for a stale
    /// touch, `None` when the ledger is empty.
    fn pop_head(&mut self) -> Option<bool> {
        let head = self.ledger.pop_oldest()?;
        let live = self
            .entries
            .get(&head.id)
            .is_some_and(|entry| entry.is_touched_at(head.touched));
        if live {
            self.entries.remove(&head.id);
        }
        Some(live)
    }

    // == Compact ==
    /// Drops every stale ledger touch, leaving one touch per cached id.
    ///
    /// Returns the number of touches dropped.
    pub fn compact(&mut self) -> usize {
        let entries = &self.entries;
        let dropped = self.ledger.retain(|touch| {
            entries
                .get(&touch.id)
                .is_some_and(|entry| entry.is_touched_at(touch.touched))
        });
        self.stats.record_compaction();
        self.refresh_sizes();
        dropped
    }

    // == Sync Targets ==
    /// Snapshot of every cached id with its current revision.
    pub fn sync_targets(&self) -> Vec<(RecordId, u64)> {
        self.entries
            .iter()
            .map(|(id, entry)| (*id, entry.revision))
            .collect()
    }

    // == Refresh ==
    /// Replaces the payload for `id` without touching it.
    ///
    /// Skipped when the id is gone or was rewritten since `revision` was
    /// read. Returns true if the payload was replaced.
    pub fn refresh(&mut self, id: RecordId, revision: u64, record: R) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) if entry.revision == revision => {
                entry.record = record;
                self.stats.record_sync_refresh();
                true
            }
            _ => false,
        }
    }

    /// Counts a refresh that failed or returned the wrong record.
    pub fn record_sync_failure(&mut self) {
        self.stats.record_sync_failure();
    }

    // == Inspection ==
    /// Returns the entry for `id` without touching it.
    pub fn peek(&self, id: RecordId) -> Option<&CacheEntry<R>> {
        self.entries.get(&id)
    }

    /// Returns true if `id` is cached, without touching it.
    pub fn contains(&self, id: RecordId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns the touch ledger, oldest first.
    pub fn ledger(&self) -> &TouchLedger {
        &self.ledger
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Length ==
    /// Returns the current number of records in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn refresh_sizes(&mut self) {
        self.stats.set_sizes(self.entries.len(), self.ledger.len());
    }
}
