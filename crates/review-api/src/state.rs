//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use review_auth::{IdentityProvider, RevocationList, SessionGuard, TokenCodec};
use review_core::config::AppConfig;
use review_core::traits::CacheProvider;
use review_database::{ModerationStore, SessionRevocationStore};
use review_service::ModerationService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Session token codec.
    pub codec: Arc<TokenCodec>,
    /// Revoked login sessions.
    pub revocations: Arc<RevocationList>,
    /// Per-request session guard.
    pub guard: Arc<SessionGuard>,
    /// Moderation workflow.
    pub moderation: Arc<ModerationService>,
    /// External identity exchange.
    pub identity_provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Wires the session and moderation components from configuration.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ModerationStore>,
        revocation_store: Arc<dyn SessionRevocationStore>,
        cache: Arc<dyn CacheProvider>,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let codec = TokenCodec::new(&config.auth, &config.session);
        let revocations = RevocationList::new(revocation_store, cache, &codec);
        let guard = SessionGuard::new(
            codec.clone(),
            revocations.clone(),
            config.server.is_development(),
        );
        let moderation = ModerationService::new(store, config.moderation.clone());

        Self {
            config: Arc::new(config),
            codec: Arc::new(codec),
            revocations: Arc::new(revocations),
            guard: Arc::new(guard),
            moderation: Arc::new(moderation),
            identity_provider,
        }
    }
}
