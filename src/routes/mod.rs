//! HTTP routes for Courier
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod health;
pub mod metrics;
pub mod operations;

use std::any::Any;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::error;

use crate::{
    error::AppError,
    request::{
        AnalyzeRequest, ChatRequest, FollowUpRequest, RewriteRequest, TemplateRequest,
        TranslateRequest,
    },
    AppState,
};
use operations::{handle, handle_stream};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let operation_routes = Router::new()
        .route("/chat", post(handle::<ChatRequest>))
        .route("/chat/stream", post(handle_stream::<ChatRequest>))
        .route("/analyze", post(handle::<AnalyzeRequest>))
        .route("/analyze/stream", post(handle_stream::<AnalyzeRequest>))
        .route("/rewrite", post(handle::<RewriteRequest>))
        .route("/rewrite/stream", post(handle_stream::<RewriteRequest>))
        .route("/translate", post(handle::<TranslateRequest>))
        .route("/translate/stream", post(handle_stream::<TranslateRequest>))
        .route("/template", post(handle::<TemplateRequest>))
        .route("/template/stream", post(handle_stream::<TemplateRequest>))
        .route("/follow_up", post(handle::<FollowUpRequest>))
        .route("/follow_up/stream", post(handle_stream::<FollowUpRequest>));

    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .nest_service("/static", ServeDir::new(&state.config.static_dir));

    // The last layer added runs first: CORS, then tracing, then the panic guard.
    Router::new()
        .merge(public_routes)
        .merge(operation_routes)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Render a handler panic as the failure envelope
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(detail = %detail, "Request handler panicked");
    AppError::Internal(anyhow::anyhow!("Unexpected failure: {}", detail)).into_response()
}
