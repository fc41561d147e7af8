//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum_extra::extract::cookie::Cookie;
use http::header::{COOKIE, LOCATION, SET_COOKIE};
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use review_api::AppState;
use review_api::router::build_router;
use review_auth::{ExternalProfile, Identity, IdentityProvider};
use review_cache::MemoryCacheProvider;
use review_core::config::{AppConfig, StoreBackend};
use review_core::error::AppError;
use review_core::result::AppResult;
use review_database::{
    MemoryModerationStore, MemorySessionRevocationStore, ModerationStore, SessionRevocationStore,
};
use review_entity::review::{NewStagedReview, StagedReview};

pub const ADMIN_SUBJECT: &str = "admin-1";
pub const USER_SUBJECT: &str = "902000001";

/// Identity provider answering from a fixed code -> profile table.
#[derive(Debug, Default)]
pub struct FakeIdentityProvider {
    profiles: HashMap<String, ExternalProfile>,
}

impl FakeIdentityProvider {
    pub fn new() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "admin-code".to_string(),
            ExternalProfile {
                subject: ADMIN_SUBJECT.to_string(),
                username: Some("root".to_string()),
            },
        );
        profiles.insert(
            "user-code".to_string(),
            ExternalProfile {
                subject: USER_SUBJECT.to_string(),
                username: Some("gburdell3".to_string()),
            },
        );
        Self { profiles }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    fn name(&self) -> &str {
        "oauth"
    }

    async fn exchange(&self, code: &str) -> AppResult<ExternalProfile> {
        self.profiles
            .get(code)
            .cloned()
            .ok_or_else(|| AppError::external_service("token exchange returned HTTP 400"))
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for issuing tokens directly
    pub state: AppState,
    /// The store behind the router
    pub store: Arc<MemoryModerationStore>,
    /// Sessions ended by logout
    pub revocations: Arc<MemorySessionRevocationStore>,
}

/// Response captured from the router
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `Location` header of a redirect.
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Last `Set-Cookie` for the given name, decoded.
    pub fn cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| Cookie::parse_encoded(v.to_string()).ok())
            .filter(|c| c.name() == name)
            .last()
    }

    /// Whether the response removes the named cookie.
    pub fn clears_cookie(&self, name: &str) -> bool {
        self.cookie(name).is_some_and(|c| {
            c.value().is_empty() && c.max_age() == Some(time::Duration::ZERO)
        })
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.environment = "test".to_string();
    config.auth.token_secret = "integration-secret".to_string();
    config.auth.admin_subjects = vec![ADMIN_SUBJECT.to_string()];
    config.moderation.store = StoreBackend::Memory;
    config
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::build(test_config(), MemoryModerationStore::new())
    }

    /// Create a test application in the given runtime mode
    pub fn with_environment(environment: &str) -> Self {
        let mut config = test_config();
        config.server.environment = environment.to_string();
        Self::build(config, MemoryModerationStore::new())
    }

    /// Create a test application over a pre-populated store
    pub fn with_store(store: MemoryModerationStore) -> Self {
        Self::build(test_config(), store)
    }

    fn build(config: AppConfig, store: MemoryModerationStore) -> Self {
        let store = Arc::new(store);
        let revocations = Arc::new(MemorySessionRevocationStore::new());
        let cache = Arc::new(MemoryCacheProvider::new(&config.cache));
        let state = AppState::new(
            config,
            Arc::clone(&store) as Arc<dyn ModerationStore>,
            Arc::clone(&revocations) as Arc<dyn SessionRevocationStore>,
            cache,
            Arc::new(FakeIdentityProvider::new()),
        );
        let router = build_router(state.clone());
        Self {
            router,
            state,
            store,
            revocations,
        }
    }

    /// `Cookie` header carrying a fresh session for the identity
    pub fn session_cookie(&self, identity: &Identity) -> String {
        let token = self.state.codec.issue(identity).expect("issue token");
        format!("jwtToken={}", token.token)
    }

    pub fn admin_cookie(&self) -> String {
        self.session_cookie(&admin())
    }

    pub fn user_cookie(&self) -> String {
        self.session_cookie(&user())
    }

    /// Put a review straight into the staging queue
    pub async fn stage(&self, body: &str) -> StagedReview {
        self.store
            .stage_review(new_review(body))
            .await
            .expect("stage review")
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        self.request("GET", path, None, cookie).await
    }

    pub async fn post_json(&self, path: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request("POST", path, Some(body), cookie).await
    }

    /// Make a request against the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub fn admin() -> Identity {
    Identity {
        subject: ADMIN_SUBJECT.to_string(),
        username: Some("root".to_string()),
        is_admin: true,
    }
}

pub fn user() -> Identity {
    Identity {
        subject: USER_SUBJECT.to_string(),
        username: Some("gburdell3".to_string()),
        is_admin: false,
    }
}

pub fn new_review(body: &str) -> NewStagedReview {
    NewStagedReview {
        course_ref: "CS6200".to_string(),
        body: body.to_string(),
        rating: Some(4),
        workload: Some(3),
        difficulty: Some(4),
        term: None,
        semester_date: None,
        author_ref: USER_SUBJECT.to_string(),
    }
}
