//! Strategy registry.

use std::fmt;
use std::sync::Arc;

use axum::http::request::Parts;
use tracing::debug;

use crate::auth::{AuthResult, Strategy};
use crate::error::AuthError;

// == Authenticator ==
/// Named strategies tried in registration order.
///
/// The first strategy to succeed wins. When all fail, every strategy's error
/// is returned together in [`AuthError::AllFailed`].
#[derive(Clone, Default)]
pub struct Authenticator {
    strategies: Vec<(String, Arc<dyn Strategy>)>,
}

impl Authenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `strategy` under `name`, replacing any strategy already
    /// registered with that name in place.
    pub fn enable_strategy<S>(&mut self, name: impl Into<String>, strategy: S) -> &mut Self
    where
        S: Strategy + 'static,
    {
        let name = name.into();
        let strategy: Arc<dyn Strategy> = Arc::new(strategy);

        match self.strategies.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = strategy,
            None => self.strategies.push((name, strategy)),
        }
        self
    }

    /// Unregisters the strategy named `name`.
    pub fn disable_strategy(&mut self, name: &str) -> Result<(), AuthError> {
        let before = self.strategies.len();
        self.strategies.retain(|(n, _)| n != name);
        if self.strategies.len() == before {
            return Err(AuthError::UnknownStrategy(name.to_string()));
        }
        Ok(())
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.strategies.iter().any(|(n, _)| n == name)
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|(n, _)| n.as_str()).collect()
    }

    // == Authenticate ==
    /// Runs the enabled strategies until one accepts the request.
    pub async fn authenticate(&self, request: &Parts) -> AuthResult {
        if self.strategies.is_empty() {
            return Err(AuthError::NoStrategies);
        }

        let mut failures = Vec::with_capacity(self.strategies.len());
        for (name, strategy) in &self.strategies {
            match strategy.authenticate(request).await {
                Ok(info) => {
                    debug!(strategy = %name, user = info.user_name(), "Request authenticated");
                    return Ok(info);
                }
                Err(err) => failures.push((name.clone(), err)),
            }
        }

        Err(AuthError::AllFailed(failures))
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
