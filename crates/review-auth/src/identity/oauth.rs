//! OAuth2 authorization-code identity provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use review_core::config::OAuthProviderConfig;
use review_core::error::{AppError, ErrorKind};
use review_core::result::AppResult;

use super::provider::{ExternalProfile, IdentityProvider};

/// Token endpoint response. Only the access token is used.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Identity provider that redeems an authorization code at a token endpoint
/// and reads the account from the userinfo endpoint.
#[derive(Debug, Clone)]
pub struct OAuthIdentityProvider {
    config: OAuthProviderConfig,
    http: reqwest::Client,
}

impl OAuthIdentityProvider {
    /// Creates a provider from configuration.
    pub fn new(config: OAuthProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Use a custom HTTP client.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    async fn exchange_code(&self, code: &str) -> AppResult<TokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(transport_error("token exchange"))?;

        let response = ensure_success(response, "token exchange").await?;
        response
            .json::<TokenResponse>()
            .await
            .map_err(transport_error("token exchange"))
    }

    async fn user_info(&self, access_token: &str) -> AppResult<Value> {
        let response = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport_error("userinfo request"))?;

        let response = ensure_success(response, "userinfo request").await?;
        response
            .json::<Value>()
            .await
            .map_err(transport_error("userinfo request"))
    }

    /// Extracts the profile from a userinfo document using the configured
    /// field names.
    fn profile_from(&self, info: &Value) -> AppResult<ExternalProfile> {
        let subject = string_field(info, &self.config.subject_field).ok_or_else(|| {
            AppError::external_service(format!(
                "Userinfo response has no '{}' field",
                self.config.subject_field
            ))
        })?;
        let username = string_field(info, &self.config.username_field);
        Ok(ExternalProfile { subject, username })
    }
}

#[async_trait]
impl IdentityProvider for OAuthIdentityProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn exchange(&self, code: &str) -> AppResult<ExternalProfile> {
        let tokens = self.exchange_code(code).await?;
        let info = self.user_info(&tokens.access_token).await?;
        let profile = self.profile_from(&info)?;
        debug!(provider = %self.config.name, subject = %profile.subject, "Identity exchanged");
        Ok(profile)
    }
}

/// Reads a field as a string. Numeric identifiers are accepted as well.
fn string_field(info: &Value, field: &str) -> Option<String> {
    match info.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn transport_error(operation: &'static str) -> impl FnOnce(reqwest::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::ExternalService, format!("{operation} failed"), e)
}

async fn ensure_success(
    response: reqwest::Response,
    operation: &'static str,
) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    warn!(operation, status, body = %body, "Identity provider returned an error");
    Err(AppError::external_service(format!(
        "{operation} returned HTTP {status}"
    )))
}
