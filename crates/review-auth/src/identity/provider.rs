//! Identity provider contract.

use async_trait::async_trait;

use review_core::config::AuthConfig;
use review_core::result::AppResult;

use super::Identity;

/// Account details returned by an external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    /// Stable account identifier at the provider.
    pub subject: String,
    /// Display name, if the provider exposes one.
    pub username: Option<String>,
}

impl ExternalProfile {
    /// Turns the profile into a session identity. Administrator rights come
    /// from the configured subject list only.
    pub fn into_identity(self, auth: &AuthConfig) -> Identity {
        let is_admin = auth.is_admin_subject(&self.subject);
        Identity {
            subject: self.subject,
            username: self.username,
            is_admin,
        }
    }
}

/// Exchanges an authorization callback for a verified external account.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Provider name as used in the callback route.
    fn name(&self) -> &str;

    /// Redeem an authorization code.
    async fn exchange(&self, code: &str) -> AppResult<ExternalProfile>;
}
