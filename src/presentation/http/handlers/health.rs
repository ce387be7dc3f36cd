//! Health Check Handlers
//!
//! Provides health check endpoints for Kubernetes-style liveness and readiness probes.
//!
//! # Endpoints
//! - `GET /health` - Basic health check (backward compatible)
//! - `GET /health/live` - Liveness probe (is the server running?)
//! - `GET /health/ready` - Readiness probe (can the server accept traffic?)

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::Instant;

use crate::infrastructure::models::{ModelKind, ModelStore};
use crate::startup::AppState;

/// Server start time for uptime calculation
static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);
static SERVER_START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Initialize the server start time (call during startup)
pub fn init_server_start() {
    Lazy::force(&SERVER_START);
    Lazy::force(&SERVER_START_TIME);
}

/// Basic health response (backward compatible)
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed health check response
#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub started_at: String,
    pub checks: HealthChecks,
}

/// Individual dependency health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub model_directory: ServiceHealth,
    pub models: ServiceHealth,
}

/// Health status for individual dependencies
#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Overall health status
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Simple liveness response
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
}

/// Basic health check endpoint (backward compatible)
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe - checks if the server is running
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "alive" })
}

/// Readiness probe - checks if every scoring model can be loaded
/// Returns 200 if ready or degraded, 503 if a model is unavailable
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = SERVER_START.elapsed().as_secs();
    let started_at = SERVER_START_TIME.to_rfc3339();

    let directory_health = check_model_directory(&state).await;
    let models_health = check_models(&state).await;

    let overall_status = determine_overall_status(&directory_health, &models_health);

    let response = DetailedHealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime,
        started_at,
        checks: HealthChecks {
            model_directory: directory_health,
            models: models_health,
        },
    };

    // Return 503 if unhealthy
    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// A missing model directory is survivable: built-in weights are used.
async fn check_model_directory(state: &AppState) -> ServiceHealth {
    let directory = state.models.inner().directory();
    match tokio::fs::metadata(directory).await {
        Ok(meta) if meta.is_dir() => ServiceHealth {
            status: HealthStatus::Healthy,
            latency_ms: None,
            message: None,
        },
        _ => ServiceHealth {
            status: HealthStatus::Degraded,
            latency_ms: None,
            message: Some(format!(
                "Model directory {} not found, using built-in weights",
                directory.display()
            )),
        },
    }
}

/// Load every weight table and report the first failure
async fn check_models(state: &AppState) -> ServiceHealth {
    let start = Instant::now();
    for kind in ModelKind::ALL {
        if let Err(e) = state.models.load(kind).await {
            return ServiceHealth {
                status: HealthStatus::Unhealthy,
                latency_ms: None,
                message: Some(format!("Model {} failed to load: {}", kind.as_str(), e)),
            };
        }
    }
    ServiceHealth {
        status: HealthStatus::Healthy,
        latency_ms: Some(start.elapsed().as_millis() as u64),
        message: None,
    }
}

/// Determine overall health based on individual checks
fn determine_overall_status(directory: &ServiceHealth, models: &ServiceHealth) -> HealthStatus {
    if models.status == HealthStatus::Unhealthy {
        return HealthStatus::Unhealthy;
    }

    if directory.status != HealthStatus::Healthy || models.status == HealthStatus::Degraded {
        return HealthStatus::Degraded;
    }

    HealthStatus::Healthy
}
