//! Touch Ledger Module
//!
//! Append-only recency index over the record table.

use std::collections::VecDeque;

use crate::cache::{RecordId, Touch};

// == Ledger Entry ==
/// One touch event for one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    /// The id that was touched
    pub id: RecordId,
    /// Stamp of the touch
    pub touched: Touch,
}

// == Touch Ledger ==
/// Ordered sequence of touches.
///
/// Entries are stored oldest first:
/// - Front = oldest touch
/// - Back = newest touch
///
/// Stamps are pushed in increasing `seq` order with non-decreasing `at`, so
/// the deque stays sorted without ever reordering.
#[derive(Debug, Default)]
pub struct TouchLedger {
    entries: VecDeque<LedgerEntry>,
}

impl TouchLedger {
    // == Constructor ==
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    // == Push ==
    /// Appends a touch at the tail.
    pub fn push(&mut self, id: RecordId, touched: Touch) {
        debug_assert!(
            self.entries.back().map_or(true, |last| last.touched < touched),
            "ledger stamps must be pushed in increasing order"
        );
        self.entries.push_back(LedgerEntry { id, touched });
    }

    // == Pop Oldest ==
    /// Removes and returns the oldest touch.
    pub fn pop_oldest(&mut self) -> Option<LedgerEntry> {
        self.entries.pop_front()
    }

    // == Peek Oldest ==
    /// Returns the oldest touch without removing it.
    pub fn peek_oldest(&self) -> Option<&LedgerEntry> {
        self.entries.front()
    }

    // == Remove ==
    /// Removes the touch for `id` stamped `touched`.
    ///
    /// Located by binary search on `seq`. Returns false if no such entry is
    /// present (already popped by eviction or dropped by compaction).
    pub fn remove(&mut self, id: RecordId, touched: Touch) -> bool {
        match self
            .entries
            .binary_search_by_key(&touched.seq, |entry| entry.touched.seq)
        {
            Ok(index) if self.entries[index].id == id => {
                self.entries.remove(index);
                true
            }
            _ => false,
        }
    }

    // == Retain ==
    /// Keeps only the entries for which `keep` returns true.
    ///
    /// Returns the number of entries dropped.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&LedgerEntry) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(keep);
        before - self.entries.len()
    }

    // == Iter ==
    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    // == Length ==
    /// Returns the number of touches held, live or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
