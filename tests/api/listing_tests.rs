//! Listing Lifecycle API Tests

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_evaluate_returns_every_policy() {
    let app = TestApp::new();
    let now = Utc::now();

    let body = json!({ "listing": draft_listing(now), "as_of": now });

    let response = app.post_json("/api/v1/listings/policies/evaluate", &body).await;

    assert_eq!(response.status, StatusCode::OK);
    let result = response.json();
    assert_eq!(result["days_on_market"], 3);
    assert_eq!(result["days_since_update"], 1);
    let policies: Vec<&str> = result["decisions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["policy"].as_str().unwrap())
        .collect();
    assert_eq!(policies, vec!["publish", "feature", "stale", "expire", "archive"]);
    assert_eq!(result["decisions"][0]["allowed"], true);
}

#[tokio::test]
async fn test_publish_transition() {
    let app = TestApp::new();
    let now = Utc::now();

    let body = json!({
        "listing": draft_listing(now),
        "target_status": "active",
        "as_of": now
    });

    let response = app.post_json("/api/v1/listings/transition", &body).await;

    assert_eq!(response.status, StatusCode::OK);
    let result = response.json();
    assert_eq!(result["previous_status"], "draft");
    assert_eq!(result["listing"]["status"], "active");
    assert!(result["listing"]["published_at"].is_string());
    assert_eq!(result["decision"]["policy"], "publish");
}

#[tokio::test]
async fn test_policy_violation_is_conflict() {
    let app = TestApp::new();
    let now = Utc::now();
    let mut listing = draft_listing(now);
    listing["photo_count"] = json!(2);
    listing["verified"] = json!(false);

    let body = json!({ "listing": listing, "target_status": "active" });

    let response = app.post_json("/api/v1/listings/transition", &body).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    let error = response.json();
    assert_eq!(error["code"], 10005);
    assert_eq!(
        error["violations"],
        json!(["ownership verified", "at least 5 photos"])
    );
}

#[tokio::test]
async fn test_lifecycle_violation_is_bad_request() {
    let app = TestApp::new();
    let now = Utc::now();

    let body = json!({ "listing": draft_listing(now), "target_status": "sold" });

    let response = app.post_json("/api/v1/listings/transition", &body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["message"],
        "cannot move listing from draft to sold"
    );
}

#[tokio::test]
async fn test_early_expiry_is_conflict() {
    let app = TestApp::new();
    let now = Utc::now();
    let mut listing = draft_listing(now);
    listing["status"] = json!("active");
    listing["published_at"] = json!(now - Duration::days(30));

    let body = json!({ "listing": listing, "target_status": "expired", "as_of": now });

    let response = app.post_json("/api/v1/listings/transition", &body).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    let error = response.json();
    assert_eq!(error["code"], 10005);
    assert_eq!(error["message"], "expire policy not satisfied");
    assert_eq!(error["violations"], json!(["on market at least 180 days"]));
}
