//! Cookie carrier configuration.

use serde::{Deserialize, Serialize};

/// How session and redirect-intent credentials are carried by the browser.
///
/// The token's own lifetime lives in [`super::AuthConfig`]; the values here
/// only control how long the browser keeps the cookies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Name of the cookie carrying the JSON redirect intent.
    #[serde(default = "default_redirect_cookie_name")]
    pub redirect_cookie_name: String,
    /// Max-age of the session cookie in days. Also bounds how long an
    /// expired token may still be refreshed.
    #[serde(default = "default_cookie_max_age_days")]
    pub cookie_max_age_days: i64,
    /// Max-age of the redirect-intent cookie in seconds.
    #[serde(default = "default_redirect_ttl")]
    pub redirect_intent_ttl_seconds: i64,
    /// Whether cookies carry the `Secure` attribute.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            redirect_cookie_name: default_redirect_cookie_name(),
            cookie_max_age_days: default_cookie_max_age_days(),
            redirect_intent_ttl_seconds: default_redirect_ttl(),
            secure_cookies: false,
        }
    }
}

fn default_cookie_name() -> String {
    "jwtToken".to_string()
}

fn default_redirect_cookie_name() -> String {
    "redirectIntent".to_string()
}

fn default_cookie_max_age_days() -> i64 {
    400
}

fn default_redirect_ttl() -> i64 {
    600
}
