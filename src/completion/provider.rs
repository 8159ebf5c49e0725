//! Completion provider abstraction
//!
//! A provider performs the raw HTTP exchange with a completion endpoint. Error
//! mapping and stream normalization live above it in
//! [`CompletionClient`](super::CompletionClient), so alternative providers
//! (or test doubles) only implement transport.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

use super::{CompletionRequest, RequestContext};
use crate::error::AppResult;

/// Stream type for streaming responses from providers
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Trait defining the interface for completion providers
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name for logging
    fn name(&self) -> &'static str;

    /// Buffered completion: one round trip, returns the reply text.
    async fn complete(&self, request: &CompletionRequest, ctx: &RequestContext) -> AppResult<String>;

    /// Streaming completion: returns the raw event-stream body once the
    /// connection is established with a success status.
    async fn open_stream(
        &self,
        request: &CompletionRequest,
        ctx: &RequestContext,
    ) -> AppResult<ByteStream>;
}
