//! Configuration Module
//!
//! Loads service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::HashAlgorithm;
use crate::error::ConfigError;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Lifetime of cached verification outcomes in seconds; also drives the sweep
    pub cache_ttl: u64,
    /// Hash applied to credential cache keys, None keeps raw `user:password` keys
    pub cache_hash: Option<HashAlgorithm>,
    /// HTTP server port
    pub server_port: u16,
    /// Demo verifier user name
    pub demo_user: String,
    /// Demo verifier password
    pub demo_password: String,
    /// Demo verifier user id
    pub demo_user_id: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `AUTH_CACHE_TTL` - Cache TTL in seconds (default: 300)
    /// - `AUTH_CACHE_HASH` - `sha256`, `sha384`, `sha512` or `none` (default: sha256)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEMO_USER`, `DEMO_PASSWORD`, `DEMO_USER_ID` - Demo credentials (default: test/test/10)
    ///
    /// A value that is set but does not parse is an error, not a fallback to
    /// the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cache_hash = match env::var("AUTH_CACHE_HASH") {
            Ok(value) => parse_hash(&value)?,
            Err(_) => defaults.cache_hash,
        };

        Ok(Self {
            cache_ttl: parse_var("AUTH_CACHE_TTL", defaults.cache_ttl)?,
            cache_hash,
            server_port: parse_var("SERVER_PORT", defaults.server_port)?,
            demo_user: env::var("DEMO_USER").unwrap_or(defaults.demo_user),
            demo_password: env::var("DEMO_PASSWORD").unwrap_or(defaults.demo_password),
            demo_user_id: env::var("DEMO_USER_ID").unwrap_or(defaults.demo_user_id),
        })
    }

    /// Cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

/// Parses a hash setting; `none` or an empty value disables hashing.
pub fn parse_hash(value: &str) -> Result<Option<HashAlgorithm>, ConfigError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    value.parse().map(Some)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: 300,
            cache_hash: Some(HashAlgorithm::Sha256),
            server_port: 3000,
            demo_user: "test".to_string(),
            demo_password: "test".to_string(),
            demo_user_id: "10".to_string(),
        }
    }
}
