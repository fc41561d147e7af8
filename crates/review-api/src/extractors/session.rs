//! `VerifiedSession`: the guard's verdict on the carried session token.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use review_auth::{Claims, Identity};

/// Session verified by the session guard middleware, inserted into request
/// extensions before the request reaches a handler.
///
/// Extracting it never fails; without the middleware it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifiedSession {
    claims: Option<Claims>,
}

impl VerifiedSession {
    /// Wraps the claims of the verified session, if any.
    pub fn new(claims: Option<Claims>) -> Self {
        Self { claims }
    }

    /// Claims of the verified session.
    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    /// Identity of the verified session.
    pub fn identity(&self) -> Option<Identity> {
        self.claims.as_ref().map(Claims::identity)
    }

    /// Reads the session from request extensions.
    pub fn from_parts(parts: &Parts) -> Self {
        parts
            .extensions
            .get::<VerifiedSession>()
            .cloned()
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for VerifiedSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
