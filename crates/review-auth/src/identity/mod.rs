//! Verified identities and the external identity exchange.

pub mod oauth;
pub mod provider;

pub use oauth::OAuthIdentityProvider;
pub use provider::{ExternalProfile, IdentityProvider};

use serde::{Deserialize, Serialize};

/// Who a request is acting as, once a session token has been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque external account identifier.
    pub subject: String,
    /// Display name, when the identity provider reported one.
    pub username: Option<String>,
    /// Administrator flag, fixed at login.
    pub is_admin: bool,
}
