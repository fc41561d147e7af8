//! Claims carried by a session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::Identity;

/// JWT claims payload of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the external account identifier.
    pub sub: String,
    /// Administrator flag, fixed at login.
    pub adm: bool,
    /// Display name reported by the identity provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Login session this token belongs to. Survives refresh.
    pub sid: Uuid,
    /// Token ID. New for every issued token.
    pub jti: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// The identity these claims vouch for.
    pub fn identity(&self) -> Identity {
        Identity {
            subject: self.sub.clone(),
            username: self.name.clone(),
            is_admin: self.adm,
        }
    }

    /// Returns the issue time as a `DateTime<Utc>`.
    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether the token is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// An encoded token together with the claims it was signed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Compact JWS string, as stored in the session cookie.
    pub token: String,
    /// Decoded claims.
    pub claims: Claims,
}

impl SessionToken {
    /// The identity carried by this token.
    pub fn identity(&self) -> Identity {
        self.claims.identity()
    }
}
