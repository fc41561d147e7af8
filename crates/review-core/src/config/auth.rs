//! Token signing and identity provider configuration.

use serde::{Deserialize, Serialize};

/// Signing secret shipped in the default configuration. Only accepted in
/// development.
pub const PLACEHOLDER_TOKEN_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for session token signing (HMAC-SHA256).
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Working lifetime of a session token in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// External subjects that are granted administrator rights at login.
    #[serde(default)]
    pub admin_subjects: Vec<String>,
    /// OAuth provider used for the external identity exchange.
    #[serde(default)]
    pub oauth: OAuthProviderConfig,
}

impl AuthConfig {
    /// Whether the given external subject is an administrator.
    pub fn is_admin_subject(&self, subject: &str) -> bool {
        self.admin_subjects.iter().any(|s| s == subject)
    }

    /// Whether the signing secret is unset or still the shipped placeholder.
    pub fn has_placeholder_secret(&self) -> bool {
        let secret = self.token_secret.trim();
        secret.is_empty() || secret == PLACEHOLDER_TOKEN_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_ttl_minutes: default_token_ttl(),
            admin_subjects: Vec::new(),
            oauth: OAuthProviderConfig::default(),
        }
    }
}

/// OAuth2 authorization-code provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthProviderConfig {
    /// Provider name as it appears in `/api/auth/callback/{provider}`.
    #[serde(default = "default_provider_name")]
    pub name: String,
    /// OAuth client identifier.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Token endpoint URL.
    #[serde(default)]
    pub token_url: String,
    /// Userinfo endpoint URL.
    #[serde(default)]
    pub userinfo_url: String,
    /// Redirect URI registered with the provider.
    #[serde(default)]
    pub redirect_uri: String,
    /// Userinfo field holding the stable account identifier.
    #[serde(default = "default_subject_field")]
    pub subject_field: String,
    /// Userinfo field holding the display name.
    #[serde(default = "default_username_field")]
    pub username_field: String,
}

impl Default for OAuthProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            client_id: String::new(),
            client_secret: String::new(),
            token_url: String::new(),
            userinfo_url: String::new(),
            redirect_uri: String::new(),
            subject_field: default_subject_field(),
            username_field: default_username_field(),
        }
    }
}

fn default_token_secret() -> String {
    PLACEHOLDER_TOKEN_SECRET.to_string()
}

fn default_token_ttl() -> u64 {
    120
}

fn default_provider_name() -> String {
    "oauth".to_string()
}

fn default_subject_field() -> String {
    "sub".to_string()
}

fn default_username_field() -> String {
    "preferred_username".to_string()
}
