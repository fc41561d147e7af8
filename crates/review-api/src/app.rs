//! Application builder: wires router, middleware, and state into a server.

use std::sync::Arc;

use axum::Router;

use review_auth::{IdentityProvider, OAuthIdentityProvider};
use review_cache::MemoryCacheProvider;
use review_core::config::AppConfig;
use review_core::error::AppError;
use review_core::result::AppResult;
use review_core::traits::CacheProvider;
use review_database::{ModerationStore, SessionRevocationStore};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the Course Review server until Ctrl+C or SIGTERM.
pub async fn run_server(
    config: AppConfig,
    store: Arc<dyn ModerationStore>,
    revocation_store: Arc<dyn SessionRevocationStore>,
) -> AppResult<()> {
    tracing::info!("Starting Course Review server...");

    let cache: Arc<dyn CacheProvider> = Arc::new(MemoryCacheProvider::new(&config.cache));
    let identity_provider: Arc<dyn IdentityProvider> =
        Arc::new(OAuthIdentityProvider::new(config.auth.oauth.clone()));
    tracing::info!(provider = %identity_provider.name(), "Identity provider configured");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, store, revocation_store, cache, identity_provider);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Course Review server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
