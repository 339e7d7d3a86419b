//! API Module
//!
//! HTTP surface of the demo service.
//!
//! # Endpoints
//! - `GET /whoami` - Identity of the authenticated caller
//! - `GET /stats` - Credential cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
