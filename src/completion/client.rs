//! Completion client
//!
//! Wraps a [`CompletionProvider`] and turns every outcome into the caller-facing
//! shapes: buffered calls always yield an [`Envelope`], streaming calls always
//! yield a chunk stream ending with a `done` chunk. Nothing raises past here.

use std::sync::Arc;
use std::time::Instant;

use futures::stream;

use super::{CompletionProvider, CompletionRequest, RequestContext};
use crate::envelope::{Envelope, NormalizedChunk};
use crate::routes::metrics::record_request;
use crate::streaming::{spawn_relay, ChunkStream};

/// Client issuing buffered and streaming completion calls
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn CompletionProvider>,
    stream_capacity: usize,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn CompletionProvider>, stream_capacity: usize) -> Self {
        Self {
            provider,
            stream_capacity,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Buffered completion.
    ///
    /// Success yields the reply text; upstream status failures, transport
    /// failures and malformed replies yield a failure envelope.
    pub async fn complete(&self, request: &CompletionRequest, operation: &str) -> Envelope {
        let start = Instant::now();
        let ctx = RequestContext::new(self.provider.name(), operation)
            .with_model(request.model())
            .with_streaming(false);
        ctx.log_request_start(request.messages().len());

        match self.provider.complete(request, &ctx).await {
            Ok(reply) => {
                ctx.log_request_complete(reply.len());
                record_request(operation, "success", start.elapsed().as_secs_f64());
                Envelope::success(reply)
            }
            Err(e) => {
                ctx.log_error(&e.to_string());
                record_request(operation, "failure", start.elapsed().as_secs_f64());
                e.into_envelope()
            }
        }
    }

    /// Streaming completion.
    ///
    /// If the connection cannot be opened or the provider answers with an
    /// error status, the stream holds exactly one failure chunk.
    pub async fn complete_streaming(&self, request: &CompletionRequest, operation: &str) -> ChunkStream {
        let start = Instant::now();
        let ctx = RequestContext::new(self.provider.name(), operation)
            .with_model(request.model())
            .with_streaming(true);
        ctx.log_request_start(request.messages().len());

        match self.provider.open_stream(request, &ctx).await {
            Ok(upstream) => {
                record_request(operation, "streaming", start.elapsed().as_secs_f64());
                spawn_relay(upstream, self.stream_capacity, ctx)
            }
            Err(e) => {
                ctx.log_error(&e.to_string());
                record_request(operation, "failure", start.elapsed().as_secs_f64());
                let chunk = NormalizedChunk::failure(e.to_string(), None);
                Box::pin(stream::iter(vec![chunk]))
            }
        }
    }
}
