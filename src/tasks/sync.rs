//! Sync Task
//!
//! Background task that refreshes every cached record through a caller
//! supplied callback, without changing record recency.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{Record, RecordId, SharedStore};

/// Future returned by a refresh callback.
pub type SyncFuture<R> = Pin<Box<dyn Future<Output = anyhow::Result<R>> + Send>>;

/// Refresh callback: fetches a complete replacement for one record.
pub type SyncFn<R> = Arc<dyn Fn(RecordId) -> SyncFuture<R> + Send + Sync>;

/// Wraps an async closure into a [`SyncFn`].
///
/// # Example
/// ```ignore
/// let refresh = sync_fn(move |id| {
///     let catalog = catalog.clone();
///     async move { catalog.fetch(id).await.map_err(Into::into) }
/// });
/// ```
pub fn sync_fn<R, F, Fut>(f: F) -> SyncFn<R>
where
    F: Fn(RecordId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    Arc::new(move |id| Box::pin(f(id)))
}

/// Outcome of one sync pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Records whose payload was replaced
    pub refreshed: usize,
    /// Records evicted or rewritten while their refresh was outstanding
    pub skipped: usize,
    /// Records whose refresh failed; their old payload was kept
    pub failed: usize,
}

/// Runs one sync pass over every record cached when the pass starts.
///
/// The store lock is released while each callback is awaited, so foreground
/// requests keep flowing during a slow refresh. Returns `None` if the store
/// was released by shutdown before or during the pass.
pub async fn sync_once<R: Record>(
    store: &SharedStore<R>,
    refresh: &SyncFn<R>,
) -> Option<SyncReport> {
    let targets = {
        let guard = store.lock().await;
        guard.as_ref()?.sync_targets()
    };

    let mut report = SyncReport::default();
    for (id, revision) in targets {
        let outcome = (**refresh)(id).await;

        let mut guard = store.lock().await;
        let records = guard.as_mut()?;
        match outcome {
            Ok(record) if record.id() == id => {
                if records.refresh(id, revision, record) {
                    report.refreshed += 1;
                } else {
                    report.skipped += 1;
                }
            }
            Ok(record) => {
                warn!(
                    "Sync: refresh for record {} returned record {}, keeping cached copy",
                    id,
                    record.id()
                );
                records.record_sync_failure();
                report.failed += 1;
            }
            Err(err) => {
                warn!("Sync: refresh for record {} failed, keeping cached copy: {:#}", id, err);
                records.record_sync_failure();
                report.failed += 1;
            }
        }
    }

    Some(report)
}

/// Spawns a background task that runs [`sync_once`] every `period`.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted by `ItemCache::shutdown`.
pub fn spawn_sync_task<R: Record>(
    store: SharedStore<R>,
    period: Duration,
    refresh: SyncFn<R>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting sync task with interval of {:?}", period);

        loop {
            tokio::time::sleep(period).await;

            let Some(report) = sync_once(&store, &refresh).await else {
                break;
            };

            if report.failed > 0 {
                warn!(
                    "Sync: refreshed {} records, skipped {}, {} failed",
                    report.refreshed, report.skipped, report.failed
                );
            } else {
                info!(
                    "Sync: refreshed {} records, skipped {}",
                    report.refreshed, report.skipped
                );
            }
        }

        debug!("Sync task stopped, store released");
    })
}
