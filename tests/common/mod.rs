//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::path::Path;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use property_intelligence::config::Settings;
use property_intelligence::startup::{build_router, AppState};

/// Test application backed by a temporary models directory
pub struct TestApp {
    pub router: Router,
    pub models_dir: TempDir,
}

/// Buffered response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestApp {
    /// Application using built-in weights for every model
    pub fn new() -> Self {
        Self::with_models(&[])
    }

    /// Application with `(file name, contents)` pairs written to the
    /// models directory before the first request
    pub fn with_models(files: &[(&str, &str)]) -> Self {
        let models_dir = tempfile::tempdir().expect("create models dir");
        for (name, contents) in files {
            std::fs::write(models_dir.path().join(name), contents).expect("write model file");
        }
        let router = router_for(models_dir.path());
        Self { router, models_dir }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> TestResponse {
        send(&self.router, Request::builder().method("GET").uri(uri).body(Body::empty())).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        send(
            &self.router,
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())),
        )
        .await
    }
}

/// Dispatch a request through a clone of `router` and buffer the response
pub async fn send(
    router: &Router,
    request: Result<Request<Body>, axum::http::Error>,
) -> TestResponse {
    let response = router
        .clone()
        .oneshot(request.expect("valid request"))
        .await
        .expect("infallible router");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec();
    TestResponse { status, body }
}

/// Router whose models directory is `directory`, which may not exist
pub fn router_for(directory: &Path) -> Router {
    let mut settings = Settings::defaults().expect("default settings");
    settings.models.directory = directory.display().to_string();
    // Keep failing-model tests fast
    for rule in &mut settings.retry.rules {
        rule.initial_delay_ms = 1;
    }
    build_router(AppState::new(settings))
}

pub fn fraud_request() -> Value {
    json!({
        "user_id": "user-42",
        "transaction_amount": 300000.0,
        "listed_price": 300000.0,
        "account_age_days": 400,
        "ip_country": "GB",
        "account_country": "GB",
        "documents_verified": true
    })
}

pub fn risk_request() -> Value {
    json!({
        "property_id": "prop-7",
        "asking_price": 400000.0,
        "estimated_value": 400000.0,
        "days_on_market": 10,
        "buyer_credit_score": 800,
        "loan_to_value": 0.6
    })
}

pub fn experience_request() -> Value {
    json!({
        "customer_id": "cust-1",
        "response_times_hours": [1.0, 2.0],
        "ratings": [5, 4, 5],
        "resolved_tickets": 2,
        "feedback": ["Excellent agent, very helpful"]
    })
}

pub fn lead_request() -> Value {
    json!({
        "lead_id": "lead-1",
        "source": "referral",
        "budget": 450000.0,
        "target_price": 400000.0,
        "pre_approved": true,
        "interactions": 8,
        "days_since_last_contact": 1,
        "viewed_listings": 12
    })
}

pub fn performance_request() -> Value {
    json!({
        "agent_id": "agent-5",
        "period_start": "2024-01-01",
        "period_end": "2024-03-31",
        "listings_handled": 20,
        "deals_closed": 6,
        "total_sales_volume": 2400000.0,
        "avg_days_to_close": 25.0,
        "client_ratings": [5, 5, 4],
        "target_deals": 5,
        "target_volume": 2000000.0
    })
}

pub fn operations_request() -> Value {
    json!({
        "process_name": "valuation",
        "sla_minutes": 60.0,
        "samples": [
            { "duration_minutes": 20.0, "succeeded": true },
            { "duration_minutes": 30.0, "succeeded": true },
            { "duration_minutes": 40.0, "succeeded": true, "manual_steps": 1 }
        ]
    })
}

/// A verified draft with enough photos to publish
pub fn draft_listing(now: DateTime<Utc>) -> Value {
    json!({
        "id": uuid::Uuid::new_v4(),
        "title": "Two bed flat",
        "status": "draft",
        "price": 320000.0,
        "photo_count": 6,
        "verified": true,
        "created_at": now - Duration::days(3),
        "published_at": null,
        "updated_at": now - Duration::days(1)
    })
}
