//! Request logging utilities for completion calls
//!
//! Provides structured logging with short correlation IDs so one operation can
//! be followed from dispatch through the end of its stream.

use std::time::Instant;
use tracing::{debug, error, info, Span};
use uuid::Uuid;

/// Context for tracking one completion call through the system
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Provider handling this request
    pub provider: String,
    /// Operation being performed (chat, analyze, ...)
    pub operation: String,
    /// Model being used
    pub model: Option<String>,
    /// Whether this is a streaming request
    pub streaming: bool,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(provider: &str, operation: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            provider: provider.to_string(),
            operation: operation.to_string(),
            model: None,
            streaming: false,
        }
    }

    /// Set the model for this request
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Mark this as a streaming request
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self, messages: usize) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            operation = %self.operation,
            model = ?self.model,
            streaming = %self.streaming,
            messages = %messages,
            "Completion request started"
        );
    }

    /// Log request being sent to upstream
    pub fn log_upstream_request(&self, url: &str) {
        debug!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            url = %url,
            elapsed_ms = %self.elapsed_ms(),
            "Sending request to upstream"
        );
    }

    /// Log response received from upstream
    pub fn log_upstream_response(&self, status: u16) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            operation = %self.operation,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from upstream"
        );
    }

    /// Log successful buffered completion
    pub fn log_request_complete(&self, reply_len: usize) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            operation = %self.operation,
            model = ?self.model,
            reply_len = %reply_len,
            elapsed_ms = %self.elapsed_ms(),
            "Completion request completed"
        );
    }

    /// Log stream started (for streaming requests)
    pub fn log_stream_started(&self) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            operation = %self.operation,
            elapsed_ms = %self.elapsed_ms(),
            "Streaming response started"
        );
    }

    /// Log stream ended
    pub fn log_stream_ended(&self, chunks: usize, outcome: &str) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            operation = %self.operation,
            chunks = %chunks,
            outcome = %outcome,
            elapsed_ms = %self.elapsed_ms(),
            "Streaming response ended"
        );
    }

    /// Log request failure
    pub fn log_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            operation = %self.operation,
            model = ?self.model,
            streaming = %self.streaming,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Completion request failed"
        );
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "completion",
            trace_id = %self.trace_id,
            provider = %self.provider,
            operation = %self.operation,
            streaming = %self.streaming,
        )
    }
}
