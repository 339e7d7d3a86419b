//! Auth Cache demo service
//!
//! Serves a Basic-auth protected endpoint whose credential checks go through
//! the FIFO/TTL credential cache.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_cache::{
    api::create_router,
    auth::{verify_fn, CachedOutcome, DefaultUser, Info, BASIC_STRATEGY_KEY},
    error::AuthError,
    AppState, Authenticator, BasicStrategy, Config, CredentialCache, FifoStore,
};

/// Main entry point for the demo service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the credential store and its expiration sweep
/// 4. Register the Basic strategy on the authenticator
/// 5. Start HTTP server on configured port
/// 6. On SIGINT/SIGTERM stop serving and cancel the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Auth Cache demo service");

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        "Configuration loaded: cache_ttl={}s, cache_hash={}, port={}",
        config.cache_ttl,
        config.cache_hash.map_or("none", |hash| hash.name()),
        config.server_port
    );

    let shutdown = CancellationToken::new();
    let store = FifoStore::<CachedOutcome>::builder(config.cache_ttl())
        .on_evicted(|_, _| debug!("Credential cache entry evicted"))
        .build(shutdown.child_token());
    let cache = CredentialCache::new(Arc::new(store.clone())).with_optional_hash(config.cache_hash);

    let demo = Arc::new(config.clone());
    let verifier = verify_fn(move |user, password| {
        let demo = demo.clone();
        async move {
            // Stand-in for a database or directory lookup.
            if user == demo.demo_user && password == demo.demo_password {
                let info: Arc<dyn Info> = Arc::new(DefaultUser::new(
                    demo.demo_user.clone(),
                    demo.demo_user_id.clone(),
                ));
                Ok(info)
            } else {
                Err(AuthError::InvalidCredentials("Invalid credentials".to_string()))
            }
        }
    });

    let mut authenticator = Authenticator::new();
    authenticator.enable_strategy(BASIC_STRATEGY_KEY, BasicStrategy::cached(verifier, cache));

    let app = create_router(AppState::new(authenticator, store));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then cancels background work.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    shutdown.cancel();
    warn!("Credential cache sweep cancelled");
}
