//! Token verification outcomes.

use thiserror::Error;

use super::claims::Claims;

/// Why a presented token did not yield a valid identity.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The signature does not match the server secret, or the token was
    /// signed with an unexpected algorithm. Never refreshable.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// The signature is authentic but the token is past its expiry.
    #[error("token has expired")]
    Expired(ExpiredToken),
    /// Missing, empty, or not a decodable token.
    #[error("token is malformed")]
    Malformed,
}

/// Proof that a token carried an authentic signature and has expired.
///
/// Only [`super::TokenCodec`] can construct this, and only after checking
/// the signature. Refresh takes it by value, so a forged or corrupt token
/// cannot be refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredToken {
    claims: Claims,
}

impl ExpiredToken {
    pub(super) fn new(claims: Claims) -> Self {
        Self { claims }
    }

    /// The authentic claims of the expired token.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub(super) fn into_claims(self) -> Claims {
        self.claims
    }
}
