//! Moderation endpoints end to end.

use chrono::Utc;
use http::StatusCode;
use serde_json::json;

use review_database::{MemoryModerationStore, ModerationStore};
use review_entity::review::{PublishedReview, ReviewId};

use crate::helpers::{TestApp, new_review};

#[tokio::test]
async fn test_accept_known_id() {
    let mut staged = new_review("Great course").into_staged(Utc::now());
    staged.id = ReviewId::from("abc123");
    let app = TestApp::with_store(MemoryModerationStore::with_records(vec![staged], vec![]));
    let admin = app.admin_cookie();

    let response = app
        .get("/api/admin/review/accept?id=abc123", Some(&admin))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"id": "abc123"}));

    let published = app.store.list_published(10).await.unwrap();
    assert_eq!(published.len(), 1);
    assert_ne!(published[0].id.as_str(), "abc123");
    assert_eq!(published[0].staged_id.as_str(), "abc123");
    assert_eq!(published[0].body, "Great course");
    assert!(
        app.store
            .find_staged(&ReviewId::from("abc123"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_second_resolution_is_not_found() {
    let app = TestApp::new();
    let admin = app.admin_cookie();
    let staged = app.stage("once").await;

    let first = app
        .get(&format!("/api/admin/review/accept?id={}", staged.id), Some(&admin))
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let again = app
        .get(&format!("/api/admin/review/accept?id={}", staged.id), Some(&admin))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.body, json!({"error": "Review not found"}));

    let reject = app
        .get(&format!("/api/admin/review/reject?id={}", staged.id), Some(&admin))
        .await;
    assert_eq!(reject.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.list_published(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reject_discards() {
    let app = TestApp::new();
    let admin = app.admin_cookie();
    let staged = app.stage("not helpful").await;

    let response = app
        .get(&format!("/api/admin/review/reject?id={}", staged.id), Some(&admin))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"id": staged.id.as_str()}));
    assert!(app.store.list_staged(10).await.unwrap().is_empty());
    assert!(app.store.list_published(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_id() {
    let app = TestApp::new();
    let admin = app.admin_cookie();

    for path in [
        "/api/admin/review/reject",
        "/api/admin/review/accept",
        "/api/admin/review/accept?id=",
    ] {
        let response = app.get(path, Some(&admin)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(response.body, json!({"error": "No ID provided"}), "{path}");
    }
}

#[tokio::test]
async fn test_repeated_id() {
    let app = TestApp::new();
    let admin = app.admin_cookie();

    let response = app
        .get("/api/admin/review/accept?id=a&id=b", Some(&admin))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({"error": "Invalid ID"}));
}

#[tokio::test]
async fn test_unknown_id() {
    let app = TestApp::new();
    let admin = app.admin_cookie();

    let response = app
        .get("/api/admin/review/reject?id=nope", Some(&admin))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({"error": "Review not found"}));
}

#[tokio::test]
async fn test_non_admin_cannot_moderate() {
    let app = TestApp::new();
    let user = app.user_cookie();
    let staged = app.stage("pending").await;

    for cookie in [Some(user.as_str()), None] {
        let response = app
            .get(&format!("/api/admin/review/accept?id={}", staged.id), cookie)
            .await;
        assert!(response.status.is_redirection());
        assert_eq!(response.location(), Some("/"));
    }

    assert!(app.store.find_staged(&staged.id).await.unwrap().is_some());
    assert!(app.store.list_published(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pending_listing() {
    let app = TestApp::new();
    let admin = app.admin_cookie();
    let first = app.stage("first").await;
    let second = app.stage("second").await;

    let response = app.get("/api/admin/reviews", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    let ids: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);

    let response = app.get("/api/admin/reviews?limit=1", Some(&admin)).await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);
    assert_eq!(response.body[0]["courseRef"], "CS6200");
}

#[tokio::test]
async fn test_listing_hides_stale_copies() {
    let staged = new_review("interrupted").into_staged(Utc::now());
    let published = PublishedReview::from_staged(staged.clone(), Utc::now());
    let app = TestApp::with_store(MemoryModerationStore::with_records(
        vec![staged.clone()],
        vec![published],
    ));
    let admin = app.admin_cookie();

    let response = app.get("/api/admin/reviews", Some(&admin)).await;
    assert_eq!(response.body, json!([]));

    let response = app
        .get(&format!("/api/admin/review/accept?id={}", staged.id), Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.list_published(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_submit_requires_session() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/reviews",
            json!({"courseRef": "CS6200", "body": "Solid."}),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, json!({"error": "Authentication required"}));
}

#[tokio::test]
async fn test_submit_stages_review() {
    let app = TestApp::new();
    let user = app.user_cookie();

    let response = app
        .post_json(
            "/api/reviews",
            json!({
                "courseRef": "cs6200",
                "body": "Lots of C, very rewarding.",
                "rating": 5,
                "workload": 4,
                "term": "fall"
            }),
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = ReviewId::from(response.body["id"].as_str().unwrap());
    let staged = app.store.find_staged(&id).await.unwrap().unwrap();
    assert_eq!(staged.course_ref, "CS6200");
    assert_eq!(staged.author_ref, crate::helpers::USER_SUBJECT);
    assert_eq!(staged.rating, Some(5));
}

#[tokio::test]
async fn test_submit_validates() {
    let app = TestApp::new();
    let user = app.user_cookie();

    let response = app
        .post_json(
            "/api/reviews",
            json!({"courseRef": "CS6200", "body": "x", "difficulty": 9}),
            Some(&user),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({"error": "Difficulty must be between 1 and 5"})
    );
    assert!(app.store.list_staged(10).await.unwrap().is_empty());
}
