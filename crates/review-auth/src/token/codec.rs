//! Signing and verification of session tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

use review_core::config::{AuthConfig, SessionConfig};
use review_core::error::AppError;
use review_core::result::AppResult;

use super::claims::{Claims, SessionToken};
use super::error::{ExpiredToken, TokenError};
use crate::identity::Identity;

/// Issues, verifies, and refreshes HS256 session tokens.
///
/// Expiry is checked by the codec itself rather than by `jsonwebtoken`, so
/// that an expired token still has its signature verified and its claims
/// recovered for refresh.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    /// Working lifetime of a token.
    token_ttl: Duration,
    /// How long after expiry a token may still be refreshed.
    refresh_window: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("token_ttl", &self.token_ttl)
            .field("refresh_window", &self.refresh_window)
            .finish()
    }
}

impl TokenCodec {
    /// Creates a codec from auth and session configuration.
    pub fn new(auth: &AuthConfig, session: &SessionConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(auth.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(auth.token_secret.as_bytes()),
            validation,
            token_ttl: Duration::minutes(auth.token_ttl_minutes as i64),
            refresh_window: Duration::days(session.cookie_max_age_days),
        }
    }

    /// Working lifetime of newly issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// How long past `exp` an expired token may still be refreshed.
    pub fn refresh_window(&self) -> Duration {
        self.refresh_window
    }

    /// Issues a token for a freshly authenticated identity.
    pub fn issue(&self, identity: &Identity) -> AppResult<SessionToken> {
        self.issue_at(identity, Utc::now())
    }

    /// Issues a token as of `now`, starting a new login session.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> AppResult<SessionToken> {
        let claims = Claims {
            sub: identity.subject.clone(),
            adm: identity.is_admin,
            name: identity.username.clone(),
            sid: Uuid::new_v4(),
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        self.sign(claims)
    }

    /// Verifies a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as of `now`.
    ///
    /// The signature is checked first; expiry is only reported for tokens
    /// whose signature is authentic.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if token.trim().is_empty() {
            return Err(TokenError::Malformed);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => {
                    debug!(error = %e, "Rejected undecodable session token");
                    TokenError::Malformed
                }
            }
        })?;

        let claims = data.claims;
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired(ExpiredToken::new(claims)));
        }
        Ok(claims)
    }

    /// Re-issues an expired token with a fresh lifetime.
    pub fn refresh(&self, expired: ExpiredToken) -> AppResult<SessionToken> {
        self.refresh_at(expired, Utc::now())
    }

    /// Re-issues an expired token as of `now`.
    ///
    /// Subject, admin flag, display name, and session id carry over; the
    /// token id and timestamps are new. Fails once the token has been
    /// expired for longer than the refresh window.
    pub fn refresh_at(&self, expired: ExpiredToken, now: DateTime<Utc>) -> AppResult<SessionToken> {
        let previous = expired.into_claims();
        if now - previous.expires_at() > self.refresh_window {
            return Err(AppError::authentication(
                "Session expired too long ago to refresh",
            ));
        }

        let claims = Claims {
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
            ..previous
        };
        debug!(sid = %claims.sid, "Refreshing session token");
        self.sign(claims)
    }

    fn sign(&self, claims: Claims) -> AppResult<SessionToken> {
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;
        Ok(SessionToken { token, claims })
    }
}
