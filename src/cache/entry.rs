//! Cache Record Module
//!
//! Defines stored records and the tracking entries the sweep queue carries.

use std::time::Duration;

use tokio::time::Instant;

// == Record ==
/// A cached value paired with its absolute expiration instant.
#[derive(Debug, Clone)]
pub struct Record<V> {
    /// The stored value
    pub value: V,
    /// Instant after which the record is logically expired
    pub expires_at: Instant,
}

impl<V> Record<V> {
    // == Constructor ==
    /// Creates a record that expires `ttl` from now.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the record has expired.
    ///
    /// A record is expired once the current time reaches its expiration
    /// instant, so a zero TTL yields an immediately expired record.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

// == Tracked ==
/// Queue entry naming a stored key and the expiration it was stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracked {
    pub key: String,
    pub expires_at: Instant,
}
