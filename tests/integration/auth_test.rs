//! Login callback, logout and revocation.

use http::StatusCode;

use review_auth::RedirectIntent;
use review_database::SessionRevocationStore;

use crate::helpers::{self, TestApp};

fn intent_cookie(path: &str, query: Option<&str>) -> String {
    let value = RedirectIntent::capture(path, query).to_json().unwrap();
    axum_extra::extract::cookie::Cookie::new("redirectIntent", value)
        .encoded()
        .to_string()
}

#[tokio::test]
async fn test_callback_issues_admin_session() {
    let app = TestApp::new();

    let response = app
        .get("/api/auth/callback/oauth?code=admin-code", None)
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    let cookie = response.cookie("jwtToken").expect("session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(time::Duration::days(400)));

    let claims = app.state.codec.verify(cookie.value()).unwrap();
    assert_eq!(claims.sub, helpers::ADMIN_SUBJECT);
    assert!(claims.adm);
    assert_eq!(claims.name.as_deref(), Some("root"));
}

#[tokio::test]
async fn test_callback_user_is_not_admin() {
    let app = TestApp::new();

    let response = app
        .get("/api/auth/callback/oauth?code=user-code", None)
        .await;

    let cookie = response.cookie("jwtToken").expect("session cookie");
    let claims = app.state.codec.verify(cookie.value()).unwrap();
    assert_eq!(claims.sub, helpers::USER_SUBJECT);
    assert!(!claims.adm);
}

#[tokio::test]
async fn test_callback_honours_redirect_intent() {
    let app = TestApp::new();
    let intent = intent_cookie("/reviews/new", Some("course=CS6200"));

    let response = app
        .get("/api/auth/callback/oauth?code=user-code", Some(&intent))
        .await;

    assert_eq!(response.location(), Some("/reviews/new?course=CS6200"));
    assert!(response.clears_cookie("redirectIntent"));
    assert!(response.cookie("jwtToken").is_some());
}

#[tokio::test]
async fn test_callback_ignores_offsite_intent() {
    let app = TestApp::new();
    let intent = intent_cookie("//evil.example", None);

    let response = app
        .get("/api/auth/callback/oauth?code=user-code", Some(&intent))
        .await;

    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_failed_login_goes_back_to_login() {
    let app = TestApp::new();
    let intent = intent_cookie("/reviews/new", None);

    for path in [
        "/api/auth/callback/oauth?code=bogus",
        "/api/auth/callback/oauth",
        "/api/auth/callback/oauth?error=access_denied",
        "/api/auth/callback/github?code=user-code",
    ] {
        let response = app.get(path, Some(&intent)).await;
        assert!(response.status.is_redirection(), "{path}");
        assert_eq!(response.location(), Some("/login"), "{path}");
        assert!(response.cookie("jwtToken").is_none(), "{path}");
        // Intent survives for the next attempt.
        assert!(response.cookie("redirectIntent").is_none(), "{path}");
    }
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = TestApp::new();
    let admin = app.admin_cookie();

    let before = app.get("/api/admin/reviews", Some(&admin)).await;
    assert_eq!(before.status, StatusCode::OK);

    let response = app.get("/api/auth/logout", Some(&admin)).await;
    assert_eq!(response.location(), Some("/"));
    assert!(response.clears_cookie("jwtToken"));
    assert_eq!(app.revocations.len(), 1);

    // Revocation lives in the store, not only in the cache.
    let claims = app
        .state
        .codec
        .verify(admin.trim_start_matches("jwtToken="))
        .unwrap();
    assert!(app.revocations.is_session_revoked(claims.sid).await.unwrap());

    // A copy of the old cookie no longer grants anything.
    let after = app.get("/api/admin/reviews", Some(&admin)).await;
    assert!(after.status.is_redirection());
    assert_eq!(after.location(), Some("/"));

    let page = app.get("/admin", Some(&admin)).await;
    assert_eq!(page.location(), Some("/"));
}

#[tokio::test]
async fn test_logout_without_session() {
    let app = TestApp::new();

    let response = app.get("/api/auth/logout", None).await;

    assert_eq!(response.location(), Some("/"));
    assert!(response.clears_cookie("jwtToken"));
    assert!(app.revocations.is_empty());
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.get("/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
