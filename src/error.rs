//! Error types for the credential cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Errors reported by a [`Cache`](crate::cache::Cache) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key was cached but its TTL elapsed. The entry is evicted as a side effect.
    #[error("Key expired: {0}")]
    Expired(String),
}

// == Auth Error Enum ==
/// Failures produced while authenticating a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The request carries no credentials this strategy understands
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Credentials were present but malformed
    #[error("Invalid authorization header: {0}")]
    InvalidHeader(String),

    /// The verifier rejected the credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// No strategy is enabled on the authenticator
    #[error("No authentication strategy enabled")]
    NoStrategies,

    /// No strategy registered under the given name
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    /// Every enabled strategy failed
    #[error("Authentication failed: {}", describe_failures(.0))]
    AllFailed(Vec<(String, AuthError)>),

    /// The backing cache reported an unexpected condition
    #[error(transparent)]
    Cache(#[from] CacheError),
}

fn describe_failures(failures: &[(String, AuthError)]) -> String {
    failures
        .iter()
        .map(|(name, err)| format!("{name}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

// == Config Error Enum ==
/// Errors raised while building configuration. Always fatal to setup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unsupported hash algorithm name
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedHash(String),

    /// Environment variable present but not parseable
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

// == IntoResponse Implementation ==
impl AuthError {
    /// HTTP status used when this error rejects a request.
    ///
    /// A lone strategy failure keeps its own status.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidHeader(_) => StatusCode::BAD_REQUEST,
            AuthError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::AllFailed(failures) if failures.len() == 1 => failures[0].1.status_code(),
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_failed_lists_each_strategy() {
        let err = AuthError::AllFailed(vec![
            ("basic".to_string(), AuthError::InvalidCredentials("bad password".to_string())),
            ("token".to_string(), AuthError::MissingCredentials("no bearer token".to_string())),
        ]);

        let message = err.to_string();
        assert!(message.contains("basic: Invalid credentials: bad password"));
        assert!(message.contains("token: Missing credentials: no bearer token"));
    }

    #[test]
    fn test_auth_error_status_codes() {
        let unauthorized = AuthError::InvalidCredentials("nope".to_string()).into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let bad_request = AuthError::InvalidHeader("garbage".to_string()).into_response();
        assert_eq!(bad_request.status(), StatusCode::BAD_REQUEST);

        let internal = AuthError::Cache(CacheError::Expired("k".to_string())).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_all_failed_status() {
        let single = AuthError::AllFailed(vec![(
            "basic".to_string(),
            AuthError::InvalidHeader("bad base64".to_string()),
        )]);
        assert_eq!(single.status_code(), StatusCode::BAD_REQUEST);

        let several = AuthError::AllFailed(vec![
            ("basic".to_string(), AuthError::InvalidHeader("bad base64".to_string())),
            ("token".to_string(), AuthError::MissingCredentials("no token".to_string())),
        ]);
        assert_eq!(several.status_code(), StatusCode::UNAUTHORIZED);
    }
}
