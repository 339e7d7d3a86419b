//! Auth Cache - authentication strategies with a self-expiring credential cache
//!
//! Strategies verify request credentials and remember the outcome in a FIFO
//! store with TTL expiration, background reclamation and eviction callbacks.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
mod tasks;

pub use api::AppState;
pub use auth::{Authenticator, BasicStrategy, CredentialCache, HashAlgorithm};
pub use cache::{Cache, FifoStore};
pub use config::Config;
