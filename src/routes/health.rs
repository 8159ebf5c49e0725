//! Health check endpoints
//!
//! - `/health` - status, version, uptime and timestamp
//! - `/health/live` - liveness check
//!
//! The completion endpoint is not called from here; a failing provider shows up in the
//! failure envelopes and in `courier_requests_total{outcome="failure"}`.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub provider: String,
    pub model: String,
}

/// Simple health response for liveness
#[derive(Debug, Serialize)]
pub struct SimpleHealthResponse {
    pub status: HealthStatus,
}

/// Service banner served at `/`
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        provider: state.dispatcher.provider_name().to_string(),
        model: state.dispatcher.settings().model.clone(),
    })
}

/// Liveness endpoint
pub async fn liveness_check() -> Json<SimpleHealthResponse> {
    Json(SimpleHealthResponse {
        status: HealthStatus::Healthy,
    })
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "The email assistant API is running. Visit /static/index.html for the web interface"
            .to_string(),
    })
}
