//! Authentication Module
//!
//! Strategies turn a request into an identity. The ones that verify
//! credentials can run through a [`CredentialCache`] so repeated requests
//! with the same credentials skip the expensive verification path.

mod authenticator;
mod basic;
mod credential_cache;
mod hash;
mod info;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::request::Parts;

use crate::error::AuthError;

pub use authenticator::Authenticator;
pub use basic::{parse_basic_credentials, BasicStrategy, STRATEGY_KEY as BASIC_STRATEGY_KEY};
pub use credential_cache::{CachedOutcome, CredentialCache};
pub use hash::HashAlgorithm;
pub use info::{DefaultUser, Info};

/// Outcome of authenticating a request.
pub type AuthResult = Result<Arc<dyn Info>, AuthError>;

// == Strategy ==
/// A pluggable unit of authentication logic.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Authenticates the request, returning the identity it carries.
    async fn authenticate(&self, request: &Parts) -> AuthResult;
}

// == Verifier ==
/// Checks an identity/secret pair, typically against a database or a
/// remote service. Supplied by the integrator.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, request: &Parts, identity: &str, secret: &str) -> AuthResult;
}

/// Verifier built from an async closure that ignores the request.
pub struct FnVerifier<F>(F);

/// Wraps `f` as a [`Verifier`].
///
/// # Example
/// ```ignore
/// let verifier = verify_fn(|user, password| async move {
///     if user == "test" && password == "test" {
///         Ok(Arc::new(DefaultUser::new("test", "10")) as Arc<dyn Info>)
///     } else {
///         Err(AuthError::InvalidCredentials("Invalid credentials".to_string()))
///     }
/// });
/// ```
pub fn verify_fn<F, Fut>(f: F) -> FnVerifier<F>
where
    F: Fn(String, String) -> Fut + Send + Sync,
    Fut: Future<Output = AuthResult> + Send,
{
    FnVerifier(f)
}

#[async_trait]
impl<F, Fut> Verifier for FnVerifier<F>
where
    F: Fn(String, String) -> Fut + Send + Sync,
    Fut: Future<Output = AuthResult> + Send,
{
    async fn verify(&self, _request: &Parts, identity: &str, secret: &str) -> AuthResult {
        (self.0)(identity.to_string(), secret.to_string()).await
    }
}
