//! Age-Based Clean Task
//!
//! Background task that periodically removes records untouched for longer
//! than the configured record lifetime.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{Clock, Record, SharedStore};

/// Spawns a background task that periodically expires old records.
///
/// The task runs in a loop, sleeping for `period` between passes. Each pass
/// holds the store lock while it pops expired ledger heads. The loop exits on
/// its own once the store has been released by shutdown.
///
/// # Arguments
/// * `store` - Shared record store
/// * `clock` - Clock the store's touch stamps are taken from
/// * `period` - Interval between passes, already floored by the caller
///
/// # Returns
/// A JoinHandle for the spawned task, aborted by `ItemCache::shutdown`.
pub fn spawn_clean_task<R: Record>(
    store: SharedStore<R>,
    clock: Clock,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting clean task with interval of {:?}", period);

        loop {
            tokio::time::sleep(period).await;

            let expired = {
                let mut guard = store.lock().await;
                match guard.as_mut() {
                    Some(records) => records.clean_at(clock.now_ms()),
                    None => break,
                }
            };

            if expired > 0 {
                info!("Clean: expired {} records", expired);
            } else {
                debug!("Clean: no expired records found");
            }
        }

        debug!("Clean task stopped, store released");
    })
}
