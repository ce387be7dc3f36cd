//! Analysis API Tests

use axum::http::StatusCode;
use serde_json::{json, Value};
use test_case::test_case;

use crate::common::*;

#[test_case("/api/v1/fraud/analyze", fraud_request(), "fraud_probability")]
#[test_case("/api/v1/risk/assess", risk_request(), "risk_score")]
#[test_case("/api/v1/experience/analyze", experience_request(), "satisfaction_score")]
#[test_case("/api/v1/leads/score", lead_request(), "conversion_probability")]
#[test_case("/api/v1/performance/evaluate", performance_request(), "performance_score")]
#[test_case("/api/v1/operations/analyze", operations_request(), "efficiency_score")]
#[tokio::test]
async fn test_analysis_endpoints_return_metadata(path: &str, body: Value, score_field: &str) {
    let app = TestApp::new();

    let response = app.post_json(path, &body).await;

    assert_eq!(response.status, StatusCode::OK);
    let result = response.json();
    assert!(result[score_field].is_number(), "missing {score_field}");
    assert_eq!(result["model_version"], "builtin-1");
    assert!(result["analysis_id"].is_string());
    assert!(result["analyzed_at"].is_string());
}

#[tokio::test]
async fn test_fraud_clean_request_is_approved() {
    let app = TestApp::new();

    let response = app.post_json("/api/v1/fraud/analyze", &fraud_request()).await;

    let result = response.json();
    assert_eq!(result["recommended_action"], "approve");
    assert_eq!(result["risk_level"], "low");
    assert_eq!(result["indicators"], json!([]));
}

#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let app = TestApp::new();
    let mut body = risk_request();
    body["buyer_credit_score"] = json!(120);
    body["property_id"] = json!("");

    let response = app.post_json("/api/v1/risk/assess", &body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let error = response.json();
    assert_eq!(error["code"], 10007);
    let fields: Vec<&str> = error["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["buyer_credit_score", "property_id"]);
}

#[tokio::test]
async fn test_nested_sample_validation() {
    let app = TestApp::new();
    let mut body = operations_request();
    body["samples"][1]["duration_minutes"] = json!(-5.0);

    let response = app.post_json("/api/v1/operations/analyze", &body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let error = response.json();
    assert_eq!(error["errors"][0]["field"], "samples[1].duration_minutes");
}

#[tokio::test]
async fn test_impossible_performance_is_bad_request() {
    let app = TestApp::new();
    let mut body = performance_request();
    body["deals_closed"] = json!(30);

    let response = app.post_json("/api/v1/performance/evaluate", &body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], 10002);
}

#[tokio::test]
async fn test_custom_model_file_changes_the_score() {
    let app = TestApp::with_models(&[(
        "risk_management.json",
        r#"{ "version": "2024-06", "weights": { "volatility": 1.0 } }"#,
    )]);
    let mut body = risk_request();
    body["market_volatility"] = json!(0.5);

    let response = app.post_json("/api/v1/risk/assess", &body).await;

    assert_eq!(response.status, StatusCode::OK);
    let result = response.json();
    assert_eq!(result["model_version"], "2024-06");
    assert_eq!(result["risk_score"], 50.0);
    assert_eq!(result["risk_level"], "medium");
}

#[tokio::test]
async fn test_corrupt_model_file_is_unavailable() {
    let app = TestApp::with_models(&[("lead_conversion.json", "[1, 2")]);

    let response = app.post_json("/api/v1/leads/score", &lead_request()).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    let error = response.json();
    assert_eq!(error["code"], 10008);
    assert_eq!(error["message"], "Service temporarily unavailable");
}

#[tokio::test]
async fn test_same_request_same_score() {
    let app = TestApp::new();

    let first = app.post_json("/api/v1/leads/score", &lead_request()).await.json();
    let second = app.post_json("/api/v1/leads/score", &lead_request()).await.json();

    assert_eq!(first["conversion_probability"], second["conversion_probability"]);
    assert_ne!(first["analysis_id"], second["analysis_id"]);
}

#[tokio::test]
async fn test_unknown_enum_variant_is_json_error() {
    let app = TestApp::new();
    let mut body = lead_request();
    body["source"] = json!("carrier_pigeon");

    let response = app.post_json("/api/v1/leads/score", &body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let error = response.json();
    assert_eq!(error["code"], 10007);
    assert!(error["message"].as_str().unwrap().contains("unknown variant"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = TestApp::new();

    let response = send(
        &app.router,
        axum::http::Request::post("/api/v1/risk/assess")
            .header("Content-Type", "application/json")
            .body(axum::body::Body::from("{ \"property_id\": ")),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], 10002);
}
