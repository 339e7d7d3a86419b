//! FIFO Store Module
//!
//! TTL cache combining a mutex-guarded HashMap with an insertion-ordered
//! queue that a background task drains to reclaim expired records.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::{Cache, CacheStats, Queue, Record, Tracked};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

/// Callback invoked with the key and value of every removed record.
pub type EvictionCallback<V> = Arc<dyn Fn(&str, &V) + Send + Sync>;

// == Shared State ==
/// State shared between store handles and the sweep task.
pub(crate) struct Shared<V> {
    inner: Mutex<Inner<V>>,
    pub(crate) queue: Queue,
    pub(crate) ttl: Duration,
    on_evicted: Option<EvictionCallback<V>>,
}

struct Inner<V> {
    records: HashMap<String, Record<V>>,
    stats: CacheStats,
}

impl<V> Shared<V> {
    pub(crate) fn new(ttl: Duration, on_evicted: Option<EvictionCallback<V>>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                records: HashMap::new(),
                stats: CacheStats::new(),
            }),
            queue: Queue::new(),
            ttl,
            on_evicted,
        }
    }

    /// Runs the eviction callback, if any. Never called with the map locked.
    fn notify_evicted(&self, key: &str, value: &V) {
        if let Some(on_evicted) = &self.on_evicted {
            on_evicted(key, value);
        }
    }

    // == Reclaim ==
    /// Removes `tracked.key` if its current record has expired.
    ///
    /// Keys that were deleted, lazily expired, or refreshed by a later store
    /// are left alone; a refreshed key has its own entry further down the
    /// queue. Returns true when a record was removed.
    pub(crate) fn reclaim(&self, tracked: &Tracked) -> bool {
        let removed = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            let expired = inner
                .records
                .get(&tracked.key)
                .is_some_and(|record| record.is_expired());
            if !expired {
                return false;
            }

            let removed = inner.records.remove(&tracked.key);
            inner.stats.record_eviction();
            inner.stats.set_total_entries(inner.records.len());
            removed
        };

        match removed {
            Some(record) => {
                self.notify_evicted(&tracked.key, &record.value);
                true
            }
            None => false,
        }
    }
}

// == FIFO Store ==
/// FIFO/TTL cache.
///
/// Every record lives for the store's TTL. A background task started at
/// construction reclaims records in the order they were stored, waking at
/// each record's deadline, so the TTL also acts as the sweep schedule. The
/// task runs until the cancellation token passed to [`FifoStoreBuilder::build`]
/// fires. After that lazy expiration on `load` keeps working and new records
/// are no longer queued for the sweep.
///
/// Handles are cheap to clone and share the same underlying map.
pub struct FifoStore<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Clone for FifoStore<V> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<V> fmt::Debug for FifoStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoStore")
            .field("ttl", &self.shared.ttl)
            .field("len", &self.shared.inner.lock().records.len())
            .finish()
    }
}

impl<V> FifoStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a store without an eviction callback and starts its sweep.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(ttl: Duration, token: CancellationToken) -> Self {
        Self::builder(ttl).build(token)
    }

    /// Starts configuring a store whose records live for `ttl`.
    pub fn builder(ttl: Duration) -> FifoStoreBuilder<V> {
        FifoStoreBuilder {
            ttl,
            on_evicted: None,
        }
    }

    // == Accessors ==
    pub fn ttl(&self) -> Duration {
        self.shared.ttl
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.shared.inner.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.records.len());
        stats
    }

    /// Returns the number of records held, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.shared.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.inner.lock().records.is_empty()
    }
}

impl<V> Cache<V> for FifoStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Load ==
    fn load(&self, key: &str) -> Result<Option<V>> {
        let removed = {
            let mut guard = self.shared.inner.lock();
            let inner = &mut *guard;

            match inner.records.get(key) {
                None => {
                    inner.stats.record_miss();
                    return Ok(None);
                }
                Some(record) if !record.is_expired() => {
                    let value = record.value.clone();
                    inner.stats.record_hit();
                    return Ok(Some(value));
                }
                Some(_) => {}
            }

            let removed = inner.records.remove(key);
            inner.stats.record_expired();
            inner.stats.record_eviction();
            inner.stats.set_total_entries(inner.records.len());
            removed
        };

        if let Some(record) = removed {
            self.shared.notify_evicted(key, &record.value);
        }
        Err(CacheError::Expired(key.to_string()))
    }

    // == Store ==
    fn store(&self, key: &str, value: V) -> Result<()> {
        let mut inner = self.shared.inner.lock();
        let record = Record::new(value, self.shared.ttl);
        let tracked = Tracked {
            key: key.to_string(),
            expires_at: record.expires_at,
        };

        inner.records.insert(key.to_string(), record);
        let len = inner.records.len();
        inner.stats.set_total_entries(len);

        // Pushed under the map lock so queue order matches store order.
        self.shared.queue.push(tracked);
        Ok(())
    }

    // == Delete ==
    fn delete(&self, key: &str) -> Result<()> {
        let removed = {
            let mut inner = self.shared.inner.lock();
            let removed = inner.records.remove(key);
            if removed.is_some() {
                inner.stats.record_eviction();
                let len = inner.records.len();
                inner.stats.set_total_entries(len);
            }
            removed
        };

        if let Some(record) = removed {
            self.shared.notify_evicted(key, &record.value);
        }
        Ok(())
    }

    // == Keys ==
    fn keys(&self) -> Vec<String> {
        self.shared.inner.lock().records.keys().cloned().collect()
    }
}

// == Builder ==
/// Configures a [`FifoStore`] before its sweep task starts.
pub struct FifoStoreBuilder<V> {
    ttl: Duration,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V> FifoStoreBuilder<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Registers a callback fired once for every removed record.
    pub fn on_evicted<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &V) + Send + Sync + 'static,
    {
        self.on_evicted = Some(Arc::new(callback));
        self
    }

    /// Builds the store and spawns its sweep task, bound to `token`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build(self, token: CancellationToken) -> FifoStore<V> {
        let shared = Arc::new(Shared::new(self.ttl, self.on_evicted));
        spawn_sweep_task(shared.clone(), token);
        debug!(ttl = ?self.ttl, "FIFO store created");

        FifoStore { shared }
    }
}
