//! API Handlers
//!
//! HTTP request handlers and the authentication middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use tracing::warn;

use crate::auth::{Authenticator, CachedOutcome, Info};
use crate::cache::FifoStore;
use crate::error::AuthError;
use crate::models::{HealthResponse, StatsResponse, WhoAmIResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Strategies protecting the routes
    pub authenticator: Arc<Authenticator>,
    /// Store behind the credential cache, kept for statistics
    pub credentials: FifoStore<CachedOutcome>,
}

impl AppState {
    /// Creates a new AppState.
    pub fn new(authenticator: Authenticator, credentials: FifoStore<CachedOutcome>) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
            credentials,
        }
    }
}

/// Identity attached to a request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct Identity(pub Arc<dyn Info>);

/// Middleware rejecting requests no enabled strategy accepts.
///
/// On success the identity is stored in the request extensions as [`Identity`].
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let (mut parts, body) = request.into_parts();

    let info = state
        .authenticator
        .authenticate(&parts)
        .await
        .inspect_err(|err| warn!(path = %parts.uri.path(), error = %err, "Authentication failed"))?;

    parts.extensions.insert(Identity(info));
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Handler for GET /whoami
///
/// Returns the identity of the authenticated caller.
pub async fn whoami_handler(Extension(identity): Extension<Identity>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse::from_info(identity.0.as_ref()))
}

/// Handler for GET /stats
///
/// Returns credential cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.credentials.stats()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
