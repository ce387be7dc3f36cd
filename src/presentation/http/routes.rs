//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{http::Uri, middleware, response::IntoResponse, routing::get, routing::post, Router};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::track_metrics;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/fraud/analyze", post(handlers::analysis::analyze_fraud))
        .route("/risk/assess", post(handlers::analysis::assess_risk))
        .route(
            "/experience/analyze",
            post(handlers::analysis::analyze_experience),
        )
        .route("/leads/score", post(handlers::analysis::score_lead))
        .route(
            "/performance/evaluate",
            post(handlers::analysis::evaluate_performance),
        )
        .route(
            "/operations/analyze",
            post(handlers::analysis::analyze_operations),
        )
        .nest("/listings", listing_routes())
}

/// Listing lifecycle routes
fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/policies/evaluate", post(handlers::listings::evaluate_policies))
        .route("/transition", post(handlers::listings::transition))
}
