//! Revoked login sessions.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use review_cache::keys;
use review_core::result::AppResult;
use review_core::traits::CacheProvider;
use review_database::SessionRevocationStore;

use super::claims::Claims;
use super::codec::TokenCodec;

/// Login sessions ended by logout.
///
/// Revocations are keyed by session id, so every token of a login session,
/// including refreshed ones, stops authenticating once it is revoked. The
/// store is the source of truth; the cache only remembers positive answers,
/// so losing a cache entry costs a store lookup and never un-revokes a
/// session.
#[derive(Debug, Clone)]
pub struct RevocationList {
    store: Arc<dyn SessionRevocationStore>,
    cache: Arc<dyn CacheProvider>,
    /// How long a revocation must be kept. A token issued just before logout
    /// lives `token_ttl` and can then be refreshed for `refresh_window`.
    retention: Duration,
}

impl RevocationList {
    /// Creates a revocation list over the given store, fronted by the cache.
    pub fn new(
        store: Arc<dyn SessionRevocationStore>,
        cache: Arc<dyn CacheProvider>,
        codec: &TokenCodec,
    ) -> Self {
        Self {
            store,
            cache,
            retention: codec.token_ttl() + codec.refresh_window(),
        }
    }

    /// How long a revocation is kept after logout.
    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Revokes the login session the claims belong to.
    pub async fn revoke(&self, claims: &Claims) -> AppResult<()> {
        self.revoke_at(claims, Utc::now()).await
    }

    /// Revokes the login session as of `now`.
    pub async fn revoke_at(&self, claims: &Claims, now: DateTime<Utc>) -> AppResult<()> {
        self.store
            .revoke_session(claims.sid, &claims.sub, now, now + self.retention)
            .await?;
        self.remember(claims).await;
        info!(sid = %claims.sid, "Session revoked");
        Ok(())
    }

    /// Whether the login session the claims belong to has been revoked.
    pub async fn is_revoked(&self, claims: &Claims) -> AppResult<bool> {
        let key = keys::revoked_session(&claims.sid.to_string());
        match self.cache.exists(&key).await {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(e) => warn!(error = %e, sid = %claims.sid, "Revocation cache lookup failed"),
        }

        let revoked = self.store.is_session_revoked(claims.sid).await?;
        if revoked {
            self.remember(claims).await;
        }
        Ok(revoked)
    }

    async fn remember(&self, claims: &Claims) {
        let key = keys::revoked_session(&claims.sid.to_string());
        let ttl = self.retention.to_std().unwrap_or_default();
        if let Err(e) = self.cache.set(&key, &claims.sub, ttl).await {
            warn!(error = %e, sid = %claims.sid, "Failed to cache session revocation");
        }
    }
}
