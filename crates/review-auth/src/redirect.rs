//! Post-login redirect intent.

use serde::{Deserialize, Serialize};

use review_core::error::AppError;
use review_core::result::AppResult;

/// The page an unauthenticated visitor asked for before being sent to login.
///
/// Serialized as JSON into a short-lived cookie and consumed exactly once by
/// the login callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectIntent {
    /// Requested path.
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    #[serde(default)]
    pub search: String,
}

impl RedirectIntent {
    /// Captures a request path and its raw query (without `?`).
    pub fn capture(path: &str, query: Option<&str>) -> Self {
        let search = match query {
            Some(q) if !q.is_empty() => format!("?{q}"),
            _ => String::new(),
        };
        Self {
            pathname: path.to_string(),
            search,
        }
    }

    /// Encodes the intent as cookie JSON.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes cookie JSON.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| AppError::validation(format!("Invalid redirect intent: {e}")))
    }

    /// Where to send the user. Anything that is not a same-origin absolute
    /// path falls back to `/`.
    pub fn target(&self) -> String {
        if is_local_path(&self.pathname) {
            format!("{}{}", self.pathname, self.search)
        } else {
            "/".to_string()
        }
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
