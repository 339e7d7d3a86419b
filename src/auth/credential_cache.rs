//! Credential Cache
//!
//! Cache-around layer for credential verification. Both successful and
//! failed outcomes are remembered for the cache's TTL, so repeated bad
//! attempts do not reach the verifier either.

use std::fmt;
use std::sync::Arc;

use axum::http::request::Parts;
use tracing::debug;

use crate::auth::{AuthResult, HashAlgorithm, Info, Verifier};
use crate::cache::Cache;
use crate::error::{AuthError, CacheError};

// == Cached Outcome ==
/// What the cache remembers about a credential pair.
#[derive(Debug, Clone)]
pub enum CachedOutcome {
    /// Verification succeeded with this identity
    Verified(Arc<dyn Info>),
    /// Verification failed with this error
    Rejected(AuthError),
}

impl CachedOutcome {
    /// Replays the outcome as the result the verifier originally produced.
    pub fn into_result(self) -> AuthResult {
        match self {
            CachedOutcome::Verified(info) => Ok(info),
            CachedOutcome::Rejected(err) => Err(err),
        }
    }
}

impl From<&AuthResult> for CachedOutcome {
    fn from(result: &AuthResult) -> Self {
        match result {
            Ok(info) => CachedOutcome::Verified(info.clone()),
            Err(err) => CachedOutcome::Rejected(err.clone()),
        }
    }
}

// == Credential Cache ==
/// Consults a [`Cache`] before running a [`Verifier`].
///
/// Keys are derived from `<identity length>:identity:secret`. The length
/// prefix keeps pairs such as `("a", "b:c")` and `("a:b", "c")` apart. Without
/// a hash the raw pair is the key, which means secrets stay in memory for the TTL window; configure a
/// [`HashAlgorithm`] to keep only digests.
///
/// Concurrent first-time requests for the same credentials may all reach the
/// verifier; the last outcome stored wins.
#[derive(Clone)]
pub struct CredentialCache {
    cache: Arc<dyn Cache<CachedOutcome>>,
    hash: Option<HashAlgorithm>,
}

impl CredentialCache {
    pub fn new(cache: Arc<dyn Cache<CachedOutcome>>) -> Self {
        Self { cache, hash: None }
    }

    /// Hashes cache keys with `hash`.
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = Some(hash);
        self
    }

    /// Sets or clears the key hash.
    pub fn with_optional_hash(mut self, hash: Option<HashAlgorithm>) -> Self {
        self.hash = hash;
        self
    }

    pub fn hash(&self) -> Option<HashAlgorithm> {
        self.hash
    }

    // == Key ==
    /// Deterministic cache key for a credential pair. Distinct pairs never
    /// share a key.
    pub fn key(&self, identity: &str, secret: &str) -> String {
        let canonical = format!("{}:{identity}:{secret}", identity.len());
        match self.hash {
            Some(hash) => hash.digest(canonical.as_bytes()),
            None => canonical,
        }
    }

    // == Authenticate ==
    /// Returns the cached outcome for the credentials, or runs `verifier` and
    /// caches whatever it returns.
    pub async fn authenticate(
        &self,
        verifier: &dyn Verifier,
        request: &Parts,
        identity: &str,
        secret: &str,
    ) -> AuthResult {
        let key = self.key(identity, secret);

        match self.cache.load(&key) {
            Ok(Some(outcome)) => {
                debug!(identity, "Credential cache hit");
                return outcome.into_result();
            }
            Ok(None) => debug!(identity, "Credential cache miss"),
            Err(CacheError::Expired(_)) => debug!(identity, "Credential cache entry expired"),
        }

        let result = verifier.verify(request, identity, secret).await;
        self.cache.store(&key, CachedOutcome::from(&result))?;
        result
    }
}

impl fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCache")
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DefaultUser;
    use crate::cache::FifoStore;
    use async_trait::async_trait;
    use axum::http::Request;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    struct CountingVerifier {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Verifier for CountingVerifier {
        async fn verify(&self, _request: &Parts, identity: &str, secret: &str) -> AuthResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if identity == "test" && secret == "test" {
                Ok(Arc::new(DefaultUser::new("test", "10")))
            } else {
                Err(AuthError::InvalidCredentials("Invalid credentials".to_string()))
            }
        }
    }

    fn parts() -> Parts {
        Request::builder().uri("/").body(()).unwrap().into_parts().0
    }

    fn setup(ttl: Duration, token: &CancellationToken) -> (CredentialCache, FifoStore<CachedOutcome>) {
        let store = FifoStore::new(ttl, token.clone());
        (CredentialCache::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_success_is_cached() {
        let token = CancellationToken::new();
        let (cache, _) = setup(Duration::from_secs(60), &token);
        let calls = Arc::new(AtomicUsize::new(0));
        let verifier = CountingVerifier { calls: calls.clone() };

        let first = cache.authenticate(&verifier, &parts(), "test", "test").await.unwrap();
        let second = cache.authenticate(&verifier, &parts(), "test", "test").await.unwrap();

        assert_eq!(first.id(), "10");
        assert_eq!(second.id(), "10");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        token.cancel();
    }

    #[tokio::test]
    async fn test_failure_is_cached_and_replayed() {
        let token = CancellationToken::new();
        let (cache, _) = setup(Duration::from_secs(60), &token);
        let calls = Arc::new(AtomicUsize::new(0));
        let verifier = CountingVerifier { calls: calls.clone() };

        let first = cache.authenticate(&verifier, &parts(), "test", "1234").await;
        let second = cache.authenticate(&verifier, &parts(), "test", "1234").await;

        let expected = AuthError::InvalidCredentials("Invalid credentials".to_string());
        assert_eq!(first.unwrap_err(), expected);
        assert_eq!(second.unwrap_err(), expected);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        token.cancel();
    }

    #[tokio::test]
    async fn test_different_secrets_use_different_entries() {
        let token = CancellationToken::new();
        let (cache, store) = setup(Duration::from_secs(60), &token);
        let calls = Arc::new(AtomicUsize::new(0));
        let verifier = CountingVerifier { calls: calls.clone() };

        assert!(cache.authenticate(&verifier, &parts(), "test", "test").await.is_ok());
        assert!(cache.authenticate(&verifier, &parts(), "test", "1234").await.is_err());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.len(), 2);
        token.cancel();
    }

    #[tokio::test]
    async fn test_expired_entry_is_verified_again() {
        let token = CancellationToken::new();
        // Sweep disabled so the stale record is still there for load to see.
        token.cancel();
        let (cache, store) = setup(Duration::from_millis(10), &token);
        let calls = Arc::new(AtomicUsize::new(0));
        let verifier = CountingVerifier { calls: calls.clone() };

        cache.authenticate(&verifier, &parts(), "test", "test").await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        cache.authenticate(&verifier, &parts(), "test", "test").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.stats().expired, 1);
    }

    #[tokio::test]
    async fn test_hashed_keys_hide_secrets() {
        let token = CancellationToken::new();
        let store = FifoStore::new(Duration::from_secs(60), token.clone());
        let cache = CredentialCache::new(Arc::new(store.clone())).with_hash(HashAlgorithm::Sha256);
        let verifier = CountingVerifier {
            calls: Arc::new(AtomicUsize::new(0)),
        };

        cache.authenticate(&verifier, &parts(), "test", "test").await.unwrap();

        let keys = store.keys();
        assert_eq!(keys, vec![HashAlgorithm::Sha256.digest(b"4:test:test")]);
        assert!(!keys[0].contains("test"));
        token.cancel();
    }

    #[test]
    fn test_key_without_hash_is_raw_pair() {
        let store = Arc::new(NullCache);
        let cache = CredentialCache::new(store);

        assert_eq!(cache.key("user", "pw"), "4:user:pw");
        assert_eq!(cache.hash(), None);
    }

    #[test]
    fn test_key_is_deterministic() {
        let cache = CredentialCache::new(Arc::new(NullCache)).with_hash(HashAlgorithm::Sha512);

        assert_eq!(cache.key("a", "b"), cache.key("a", "b"));
        assert_ne!(cache.key("a", "b"), cache.key("a", "c"));
    }

    #[test]
    fn test_key_separates_colon_bearing_pairs() {
        let raw = CredentialCache::new(Arc::new(NullCache));
        let hashed = CredentialCache::new(Arc::new(NullCache)).with_hash(HashAlgorithm::Sha256);

        for cache in [raw, hashed] {
            assert_ne!(cache.key("alice", "x:y"), cache.key("alice:x", "y"));
            assert_ne!(cache.key("", "a:b"), cache.key("a", "b"));
            assert_ne!(cache.key("a:", "b"), cache.key("a", ":b"));
        }
    }

    #[tokio::test]
    async fn test_colon_in_identity_does_not_reuse_another_pair() {
        let token = CancellationToken::new();
        let (cache, store) = setup(Duration::from_secs(60), &token);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let verifier = crate::auth::verify_fn(move |identity, secret| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if identity == "alice" && secret == "x:y" {
                    Ok(Arc::new(DefaultUser::new("alice", "1")) as Arc<dyn Info>)
                } else {
                    Err(AuthError::InvalidCredentials("Invalid credentials".to_string()))
                }
            }
        });

        let genuine = cache.authenticate(&verifier, &parts(), "alice", "x:y").await;
        assert_eq!(genuine.unwrap().id(), "1");

        let other = cache.authenticate(&verifier, &parts(), "alice:x", "y").await;
        assert!(other.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.len(), 2);

        // A cached failure for the look-alike pair leaves the real one alone.
        let again = cache.authenticate(&verifier, &parts(), "alice", "x:y").await;
        assert_eq!(again.unwrap().id(), "1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        token.cancel();
    }

    /// Cache that never remembers anything.
    struct NullCache;

    impl Cache<CachedOutcome> for NullCache {
        fn load(&self, _key: &str) -> crate::error::Result<Option<CachedOutcome>> {
            Ok(None)
        }

        fn store(&self, _key: &str, _value: CachedOutcome) -> crate::error::Result<()> {
            Ok(())
        }

        fn delete(&self, _key: &str) -> crate::error::Result<()> {
            Ok(())
        }

        fn keys(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_without_cached_entries_verifier_runs_every_time() {
        let cache = CredentialCache::new(Arc::new(NullCache));
        let calls = Arc::new(AtomicUsize::new(0));
        let verifier = CountingVerifier { calls: calls.clone() };

        for _ in 0..3 {
            cache.authenticate(&verifier, &parts(), "test", "test").await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
