//! Cache Entry Module
//!
//! Defines the record trait, touch stamps and the per-id table entry.

use tokio::time::Instant;

// == Record ==
/// Identifier of a cached record.
pub type RecordId = u64;

/// A payload the cache can hold.
///
/// The cache treats records as opaque apart from their identifier.
pub trait Record: Clone + Send + Sync + 'static {
    /// Returns the unique identifier of this record.
    fn id(&self) -> RecordId;
}

// == Touch ==
/// Stamp recorded every time a record is read or written.
///
/// `at` drives age decisions, `seq` drives liveness decisions. Two touches
/// never share a `seq`, even when they land in the same millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Touch {
    /// Milliseconds since the cache clock origin
    pub at: u64,
    /// Strictly increasing per-cache sequence number
    pub seq: u64,
}

// == Cache Entry ==
/// Represents the current state of one cached id.
#[derive(Debug, Clone)]
pub struct CacheEntry<R> {
    /// Stamp of the last read or write
    pub touched: Touch,
    /// Sequence of the write that stored this record; reads and sync keep it
    pub revision: u64,
    /// The cached record
    pub record: R,
}

impl<R> CacheEntry<R> {
    // == Is Live ==
    /// Returns true if `stamp` is this entry's current touch.
    pub fn is_touched_at(&self, stamp: Touch) -> bool {
        self.touched == stamp
    }
}

// == Clock ==
/// Monotonic millisecond clock anchored at cache construction.
///
/// Built on `tokio::time::Instant` so paused test runtimes control it.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    /// Starts a clock at zero.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock started.
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}
