//! Health Check API Tests

use axum::body::Body;
use axum::http::{Request, StatusCode};

use crate::common::{router_for, send, TestApp};

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");
}

#[tokio::test]
async fn test_liveness() {
    let app = TestApp::new();

    let response = app.get("/health/live").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "alive");
}

#[tokio::test]
async fn test_readiness_with_builtin_models() {
    let app = TestApp::new();

    let response = app.get("/health/ready").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["models"]["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_degraded_without_model_directory() {
    let root = tempfile::tempdir().unwrap();
    let router = router_for(&root.path().join("missing"));

    let response = send(&router, Request::get("/health/ready").body(Body::empty())).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["model_directory"]["status"], "degraded");
}

#[tokio::test]
async fn test_readiness_unhealthy_with_corrupt_model() {
    let app = TestApp::with_models(&[("risk_management.json", "{ not json")]);

    let response = app.get("/health/ready").await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json()["status"], "unhealthy");
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_request_counts() {
    let app = TestApp::new();
    assert_eq!(app.get("/health").await.status, StatusCode::OK);

    let response = app.get("/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .text()
        .contains("property_intelligence_http_requests_total"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();

    let response = app.get("/api/v1/unknown").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["code"], 10001);
}
