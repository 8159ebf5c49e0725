//! Operation endpoints
//!
//! `/chat`, `/analyze`, `/rewrite`, `/translate`, `/template` and `/follow_up`
//! share two generic handlers: one honoring the body's `stream` flag and one
//! forcing a streamed reply (the `/stream` variants).

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::{AppError, AppResult},
    request::OperationRequest,
    streaming::ChunkStream,
    AppState,
};

/// Run an operation, buffered or streamed according to the body
pub async fn handle<T>(
    State(state): State<Arc<AppState>>,
    body: Result<Json<T>, JsonRejection>,
) -> AppResult<Response>
where
    T: OperationRequest + DeserializeOwned,
{
    let Json(body) = body?;
    let stream = body.wants_stream();
    run(&state, body, stream).await
}

/// Run an operation with a streamed reply regardless of the body's flag
pub async fn handle_stream<T>(
    State(state): State<Arc<AppState>>,
    body: Result<Json<T>, JsonRejection>,
) -> AppResult<Response>
where
    T: OperationRequest + DeserializeOwned,
{
    let Json(body) = body?;
    run(&state, body, true).await
}

async fn run<T: OperationRequest>(state: &AppState, body: T, stream: bool) -> AppResult<Response> {
    let operation = body.into_operation();
    debug!(operation = %operation.name(), stream = %stream, "Dispatching operation");

    if stream {
        let chunks = state.dispatcher.stream(operation).await;
        stream_response(chunks)
    } else {
        let envelope = state.dispatcher.execute(operation).await;
        Ok(Json(envelope).into_response())
    }
}

/// Plain-text body of newline-terminated JSON chunks, flushed as produced
fn stream_response(chunks: ChunkStream) -> AppResult<Response> {
    let body = Body::from_stream(chunks.map(|chunk| Ok::<_, Infallible>(chunk.to_line())));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .header("X-Accel-Buffering", "no")
        .body(body)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))
}
