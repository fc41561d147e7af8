//! Cache key builders.
//!
//! Centralised so that every component agrees on the key layout.

/// Prefix for revoked login sessions.
pub const REVOKED_SESSION_PREFIX: &str = "session:revoked:";

/// Key marking a login session as revoked.
pub fn revoked_session(session_id: &str) -> String {
    format!("{REVOKED_SESSION_PREFIX}{session_id}")
}
