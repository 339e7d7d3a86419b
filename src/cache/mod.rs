//! Cache Module
//!
//! Provides the [`Cache`] abstraction and a FIFO store with TTL expiration,
//! background reclamation and eviction notification.

mod entry;
mod queue;
mod stats;
mod store;


// Re-export public types
pub use entry::{Record, Tracked};
pub use queue::Queue;
pub use stats::CacheStats;
pub use store::{EvictionCallback, FifoStore, FifoStoreBuilder};

pub(crate) use store::Shared;

use crate::error::Result;

// == Cache Trait ==
/// A concurrency-safe key/value store used by strategies to remember
/// verification outcomes.
///
/// `load` has three outcomes:
/// - `Ok(None)`: the key was never stored (or is already gone);
/// - `Err(CacheError::Expired(_))`: the key existed but its TTL elapsed. The
///   record is removed by this very call, so a query doubles as a mutation;
/// - `Ok(Some(value))`: the key is cached and live.
///
/// Eviction callbacks run after the store's lock is released. They fire in
/// insertion order when removals come from the sweep alone or from a single
/// caller; removals racing on different tasks may report out of order.
///
/// [`CacheError::Expired`]: crate::error::CacheError::Expired
pub trait Cache<V>: Send + Sync {
    /// Looks up a key, lazily evicting it if its record is stale.
    fn load(&self, key: &str) -> Result<Option<V>>;

    /// Stores a value, overwriting any previous record and resetting its TTL.
    fn store(&self, key: &str, value: V) -> Result<()>;

    /// Removes a key. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Snapshot of the keys currently held, expired or not.
    fn keys(&self) -> Vec<String>;
}
