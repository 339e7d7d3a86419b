//! HTTP Basic authentication strategy.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::auth::{AuthResult, CredentialCache, Strategy, Verifier};
use crate::error::AuthError;

/// Name the strategy is usually registered under.
pub const STRATEGY_KEY: &str = "basic";

// == Basic Strategy ==
/// Reads `Authorization: Basic <base64(user:password)>` and hands the pair to
/// a [`Verifier`], optionally through a [`CredentialCache`].
pub struct BasicStrategy {
    verifier: Arc<dyn Verifier>,
    cache: Option<CredentialCache>,
}

impl BasicStrategy {
    /// Strategy that calls the verifier on every request.
    pub fn new<V>(verifier: V) -> Self
    where
        V: Verifier + 'static,
    {
        Self {
            verifier: Arc::new(verifier),
            cache: None,
        }
    }

    /// Strategy that remembers verification outcomes in `cache`.
    pub fn cached<V>(verifier: V, cache: CredentialCache) -> Self
    where
        V: Verifier + 'static,
    {
        Self {
            verifier: Arc::new(verifier),
            cache: Some(cache),
        }
    }
}

#[async_trait]
impl Strategy for BasicStrategy {
    async fn authenticate(&self, request: &Parts) -> AuthResult {
        let (user, password) = parse_basic_credentials(&request.headers)?;

        match &self.cache {
            Some(cache) => {
                cache
                    .authenticate(self.verifier.as_ref(), request, &user, &password)
                    .await
            }
            None => self.verifier.verify(request, &user, &password).await,
        }
    }
}

// == Header Parsing ==
/// Extracts the user and password from a Basic `Authorization` header.
///
/// A missing header or a different scheme yields
/// [`AuthError::MissingCredentials`]; a Basic header that does not decode to
/// `user:password` yields [`AuthError::InvalidHeader`].
pub fn parse_basic_credentials(headers: &HeaderMap) -> Result<(String, String), AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AuthError::MissingCredentials("no authorization header".to_string()))?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader("authorization header is not ASCII".to_string()))?;

    let (scheme, encoded) = value.trim().split_once(' ').unwrap_or((value.trim(), ""));
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::MissingCredentials(
            "no basic authorization header".to_string(),
        ));
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AuthError::InvalidHeader(format!("invalid base64: {e}")))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AuthError::InvalidHeader("credentials are not UTF-8".to_string()))?;

    let (user, password) = decoded
        .split_once(':')
        .ok_or_else(|| AuthError::InvalidHeader("missing ':' separator".to_string()))?;

    Ok((user.to_string(), password.to_string()))
}
