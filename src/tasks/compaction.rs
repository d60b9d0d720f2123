//! Ledger Compaction Task
//!
//! Debounced one-shot task that drops stale touches from the ledger.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::{Record, SharedStore};

/// Spawns a one-shot compaction that runs after `delay`.
///
/// The caller must already have claimed `pending` (false -> true); the task
/// clears it once the pass is done, under the store lock, so a read that sees
/// the flag cleared also sees the compacted ledger.
pub fn spawn_compaction_task<R: Record>(
    store: SharedStore<R>,
    delay: Duration,
    pending: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let mut guard = store.lock().await;
        if let Some(records) = guard.as_mut() {
            let dropped = records.compact();
            debug!(
                "Ledger compaction: dropped {} stale touches, {} remain",
                dropped,
                records.ledger().len()
            );
        }
        pending.store(false, Ordering::Release);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    use crate::cache::RecordStore;
    use crate::models::ProductRecord;

    fn hot_store() -> SharedStore<ProductRecord> {
        let mut records = RecordStore::new(2, 3_600_000);
        records.write_at(ProductRecord::new(1, "hot", 1.0, "USD"), 0);
        for t in 1..10 {
            records.get_at(1, t);
        }
        Arc::new(Mutex::new(Some(records)))
    }

    async fn ledger_len(store: &SharedStore<ProductRecord>) -> usize {
        store.lock().await.as_ref().unwrap().ledger().len()
    }

    #[tokio::test(start_paused = true)]
    async fn test_compaction_waits_for_delay() {
        let store = hot_store();
        let pending = Arc::new(AtomicBool::new(true));

        let handle = spawn_compaction_task(store.clone(), Duration::from_secs(5), pending.clone());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(ledger_len(&store).await, 10);
        assert!(pending.load(Ordering::Acquire));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(ledger_len(&store).await, 1);
        assert!(!pending.load(Ordering::Acquire));
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_compaction_after_release_clears_pending() {
        let store = hot_store();
        let pending = Arc::new(AtomicBool::new(true));

        let handle = spawn_compaction_task(store.clone(), Duration::from_secs(5), pending.clone());
        store.lock().await.take();

        handle.await.unwrap();
        assert!(!pending.load(Ordering::Acquire));
    }
}
