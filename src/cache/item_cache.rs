//! Item Cache Module
//!
//! Async facade over the record store: serializes foreground access and
//! owns the clean, sync and compaction tasks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStats, Clock, Record, RecordId, RecordStore, SharedStore};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_clean_task, spawn_compaction_task, spawn_sync_task, SyncFn};

// == Item Cache ==
/// Bounded, time-aware write-through cache.
///
/// One lock guards the record table and touch ledger together. The store
/// is `None` once [`shutdown`](Self::shutdown) has run, which every
/// operation reports as [`CacheError::ShutDown`].
pub struct ItemCache<R: Record> {
    store: SharedStore<R>,
    clock: Clock,
    compaction_delay: Duration,
    compaction_pending: Arc<AtomicBool>,
    compaction_task: Mutex<Option<JoinHandle<()>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<R: Record> ItemCache<R> {
    // == Constructors ==
    /// Creates a cache with a clean task and no sync task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: &CacheConfig) -> Self {
        Self::start(config, None)
    }

    /// Creates a cache that also refreshes its records through `refresh`
    /// every [`CacheConfig::sync_period`].
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_sync(config: &CacheConfig, refresh: SyncFn<R>) -> Self {
        Self::start(config, Some(refresh))
    }

    fn start(config: &CacheConfig, refresh: Option<SyncFn<R>>) -> Self {
        let store: SharedStore<R> = Arc::new(Mutex::new(Some(RecordStore::new(
            config.max_items,
            config.record_lifetime_ms,
        ))));
        let clock = Clock::start();

        let mut tasks = vec![spawn_clean_task(store.clone(), clock, config.clean_period())];
        if let Some(refresh) = refresh {
            tasks.push(spawn_sync_task(store.clone(), config.sync_period(), refresh));
        }

        info!(
            "Item cache started: max_items={}, record_lifetime={}ms, sync={}",
            config.max_items,
            config.record_lifetime_ms,
            tasks.len() > 1
        );

        Self {
            store,
            clock,
            compaction_delay: config.compaction_delay(),
            compaction_pending: Arc::new(AtomicBool::new(false)),
            compaction_task: Mutex::new(None),
            tasks: Mutex::new(tasks),
        }
    }

    // == Write ==
    /// Inserts or overwrites a record, evicting the oldest records if the
    /// cache grows past capacity.
    pub async fn write(&self, record: R) -> Result<()> {
        let mut guard = self.store.lock().await;
        let records = guard.as_mut().ok_or(CacheError::ShutDown)?;

        let id = record.id();
        let evicted = records.write_at(record, self.clock.now_ms());
        if evicted > 0 {
            debug!("Write of record {} evicted {} records", id, evicted);
        }
        Ok(())
    }

    // == Get ==
    /// Returns the record for `id`, or `None` on a miss.
    ///
    /// A hit refreshes the record's recency and may schedule a ledger
    /// compaction.
    pub async fn get(&self, id: RecordId) -> Result<Option<R>> {
        let mut guard = self.store.lock().await;
        let records = guard.as_mut().ok_or(CacheError::ShutDown)?;

        let record = records.get_at(id, self.clock.now_ms());
        if record.is_some() && records.needs_compaction() {
            self.schedule_compaction().await;
        }
        Ok(record)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> Result<CacheStats> {
        let guard = self.store.lock().await;
        guard
            .as_ref()
            .map(RecordStore::stats)
            .ok_or(CacheError::ShutDown)
    }

    // == Shutdown ==
    /// Stops every background task and releases the cached records.
    ///
    /// Safe to call more than once.
    pub async fn shutdown(&self) {
        let released = self.store.lock().await.take();

        for task in self.tasks.lock().await.drain(..) {
            task.abort();
        }
        if let Some(task) = self.compaction_task.lock().await.take() {
            task.abort();
        }

        if let Some(records) = released {
            info!("Item cache shut down, released {} records", records.len());
        }
    }

    /// True while a scheduled ledger compaction has not yet run.
    pub fn is_compaction_pending(&self) -> bool {
        self.compaction_pending.load(Ordering::Acquire)
    }

    // == Schedule Compaction ==
    /// Starts the debounced compaction unless one is already pending.
    async fn schedule_compaction(&self) {
        if self
            .compaction_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        debug!(
            "Ledger past twice the capacity, compacting in {:?}",
            self.compaction_delay
        );
        let task = spawn_compaction_task(
            self.store.clone(),
            self.compaction_delay,
            self.compaction_pending.clone(),
        );
        *self.compaction_task.lock().await = Some(task);
    }
}

impl<R: Record> Drop for ItemCache<R> {
    fn drop(&mut self) {
        for task in self.tasks.get_mut().drain(..) {
            task.abort();
        }
        if let Some(task) = self.compaction_task.get_mut().take() {
            task.abort();
        }
    }
}
