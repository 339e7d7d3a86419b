//! Expiration Sweep Task
//!
//! Background task that reclaims expired records in the order they were stored.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::Shared;

/// Spawns the task that drains a store's queue and reclaims expired records.
///
/// For each tracked key, oldest first, the task waits until the deadline the
/// key was stored with, then removes the key if its current record has
/// expired. Eviction callbacks therefore fire in insertion order.
///
/// Cancellation is checked before taking each entry and while waiting on its
/// deadline. On exit the queue is closed, so later stores stop tracking keys
/// and stale records are only removed lazily. The task never holds the map
/// lock across an await.
///
/// # Arguments
/// * `shared` - State shared with the owning store
/// * `token` - Stops the task when cancelled
///
/// # Returns
/// A JoinHandle for the spawned task.
pub(crate) fn spawn_sweep_task<V>(shared: Arc<Shared<V>>, token: CancellationToken) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        debug!(ttl = ?shared.ttl, "Starting expiration sweep task");

        loop {
            let tracked = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                tracked = shared.queue.next() => tracked,
            };

            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tokio::time::sleep_until(tracked.expires_at) => {}
            }

            if shared.reclaim(&tracked) {
                debug!(key = %tracked.key, "Sweep reclaimed expired record");
            }
        }

        let dropped = shared.queue.close();
        info!(dropped, "Expiration sweep task stopped");
    })
}
