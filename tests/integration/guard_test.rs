//! Session guard behaviour as seen over HTTP.

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;

use review_auth::RedirectIntent;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_new_review_requires_login() {
    let app = TestApp::new();

    let response = app.get("/reviews/new", None).await;

    assert!(response.status.is_redirection());
    assert_eq!(response.location(), Some("/login"));
    let intent = response.cookie("redirectIntent").expect("intent cookie");
    let stored: serde_json::Value = serde_json::from_str(intent.value()).unwrap();
    assert_eq!(stored, json!({"pathname": "/reviews/new", "search": ""}));
    assert_eq!(intent.max_age(), Some(time::Duration::seconds(600)));
}

#[tokio::test]
async fn test_new_review_with_session_passes() {
    let app = TestApp::new();
    let cookie = app.user_cookie();

    let response = app.get("/reviews/new", Some(&cookie)).await;

    // Allowed through to the page layer, which this server does not render.
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.cookie("redirectIntent").is_none());
}

#[tokio::test]
async fn test_course_slug_is_canonicalized() {
    let app = TestApp::new();

    let response = app.get("/courses/cs6200/reviews", None).await;
    assert!(response.status.is_redirection());
    assert_eq!(response.location(), Some("/courses/CS6200/reviews"));

    let response = app.get("/courses/cs6200/reviews?sort=new", None).await;
    assert_eq!(response.location(), Some("/courses/CS6200/reviews?sort=new"));

    let response = app.get("/courses/CS6200/reviews", None).await;
    assert!(response.location().is_none());
}

#[tokio::test]
async fn test_login_page_redirects_signed_in_users() {
    let app = TestApp::new();
    let cookie = app.user_cookie();

    let response = app.get("/login", Some(&cookie)).await;
    assert_eq!(response.location(), Some("/"));

    let response = app.get("/login", None).await;
    assert!(response.location().is_none());
}

#[tokio::test]
async fn test_admin_pages_deny_alike() {
    let app = TestApp::new();
    let user = app.user_cookie();

    let anonymous = app.get("/admin", None).await;
    let non_admin = app.get("/admin", Some(&user)).await;

    assert_eq!(anonymous.status, non_admin.status);
    assert_eq!(anonymous.location(), Some("/"));
    assert_eq!(non_admin.location(), Some("/"));
    assert_eq!(anonymous.body, non_admin.body);

    let admin = app.admin_cookie();
    let response = app.get("/admin", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dev_endpoints_need_development_mode() {
    let response = TestApp::new().get("/api/services/seed", None).await;
    assert_eq!(response.location(), Some("/"));

    let response = TestApp::with_environment("development")
        .get("/api/services/seed", None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_session_is_refreshed_on_the_way_out() {
    let app = TestApp::new();
    let old = app
        .state
        .codec
        .issue_at(&helpers::admin(), Utc::now() - Duration::hours(3))
        .unwrap();
    let cookie = format!("jwtToken={}", old.token);

    let response = app.get("/api/admin/reviews", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    let refreshed = response.cookie("jwtToken").expect("refreshed cookie");
    assert_ne!(refreshed.value(), old.token);
    assert_eq!(refreshed.max_age(), Some(time::Duration::days(400)));
    assert_eq!(refreshed.http_only(), Some(true));
    assert_eq!(refreshed.path(), Some("/"));

    let claims = app.state.codec.verify(refreshed.value()).unwrap();
    assert_eq!(claims.sub, helpers::ADMIN_SUBJECT);
    assert!(claims.adm);
    assert_eq!(claims.sid, old.claims.sid);
}

#[tokio::test]
async fn test_refresh_rides_along_with_redirect() {
    let app = TestApp::new();
    let old = app
        .state
        .codec
        .issue_at(&helpers::user(), Utc::now() - Duration::hours(3))
        .unwrap();
    let cookie = format!("jwtToken={}", old.token);

    let response = app.get("/sign-up", Some(&cookie)).await;

    assert_eq!(response.location(), Some("/"));
    assert!(response.cookie("jwtToken").is_some_and(|c| !c.value().is_empty()));
}

#[tokio::test]
async fn test_corrupt_token_is_discarded() {
    let app = TestApp::new();
    let intent = RedirectIntent::capture("/reviews/new", None).to_json().unwrap();
    let stale_intent = axum_extra::extract::cookie::Cookie::new("redirectIntent", intent)
        .encoded()
        .to_string();
    let cookie = format!("jwtToken=garbage.token.value; {stale_intent}");

    let response = app.get("/", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.clears_cookie("jwtToken"));
    assert!(response.clears_cookie("redirectIntent"));
}

#[tokio::test]
async fn test_valid_session_sets_no_cookies() {
    let app = TestApp::new();
    let cookie = app.user_cookie();

    let response = app.get("/api/health", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert!(response.headers.get(http::header::SET_COOKIE).is_none());
}
