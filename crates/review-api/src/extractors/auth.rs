//! `AuthUser` extractor: requires a verified session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use review_auth::{Claims, Identity};
use review_core::error::AppError;

use super::session::VerifiedSession;
use crate::error::ApiError;

/// Signed-in user. Rejects with 401 when the request carries no valid
/// session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    claims: Claims,
    identity: Identity,
}

impl AuthUser {
    /// Verified identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Claims of the session token.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

impl std::ops::Deref for AuthUser {
    type Target = Identity;
    fn deref(&self) -> &Self::Target {
        &self.identity
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = VerifiedSession::from_parts(parts);
        let claims = session
            .claims()
            .cloned()
            .ok_or_else(|| AppError::authentication("Authentication required"))?;
        Ok(Self {
            identity: claims.identity(),
            claims,
        })
    }
}
