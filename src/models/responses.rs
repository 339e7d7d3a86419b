//! Response DTOs for the demo service
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::auth::Info;
use crate::cache::CacheStats;

/// Response body for the identity endpoint (GET /whoami)
#[derive(Debug, Clone, Serialize)]
pub struct WhoAmIResponse {
    /// Identifier of the authenticated user
    pub id: String,
    /// User name
    pub name: String,
    /// Groups the user belongs to
    pub groups: Vec<String>,
}

impl WhoAmIResponse {
    /// Builds the response from an authenticated identity
    pub fn from_info(info: &dyn Info) -> Self {
        Self {
            id: info.id().to_string(),
            name: info.user_name().to_string(),
            groups: info.groups().to_vec(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups for credentials never seen
    pub misses: u64,
    /// Lookups that found a stale entry
    pub expired: u64,
    /// Entries removed for any reason
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate over all lookups
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
