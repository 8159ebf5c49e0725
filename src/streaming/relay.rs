//! Producer task bridging the upstream byte stream and the response body
//!
//! The producer reads upstream bytes, normalizes them and pushes chunks into a
//! bounded channel; the response body drains the channel. When the caller
//! disconnects the body is dropped, the channel closes and the producer stops,
//! dropping the upstream stream and with it the outbound connection.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, Instrument};

use super::StreamNormalizer;
use crate::completion::{ByteStream, RequestContext};
use crate::envelope::NormalizedChunk;
use crate::routes::metrics::{record_stream_chunks, StreamGauge};

/// Stream of normalized chunks handed to the response body
pub type ChunkStream = Pin<Box<dyn Stream<Item = NormalizedChunk> + Send>>;

/// Spawn the producer task for one streaming request.
///
/// The returned stream always ends with exactly one `done` chunk, unless the
/// consumer drops it first.
pub fn spawn_relay(upstream: ByteStream, capacity: usize, ctx: RequestContext) -> ChunkStream {
    let (tx, mut rx) = mpsc::channel(capacity.max(1));
    let span = ctx.create_span();

    tokio::spawn(produce(upstream, tx, ctx).instrument(span));

    Box::pin(async_stream::stream! {
        while let Some(chunk) = rx.recv().await {
            yield chunk;
        }
    })
}

async fn produce(mut upstream: ByteStream, tx: mpsc::Sender<NormalizedChunk>, ctx: RequestContext) {
    let _gauge = StreamGauge::open();
    let mut normalizer = StreamNormalizer::new();
    let mut sent = 0usize;

    ctx.log_stream_started();

    loop {
        let next = tokio::select! {
            _ = tx.closed() => {
                debug!(trace_id = %ctx.trace_id, "Caller detached, closing upstream stream");
                ctx.log_stream_ended(sent, "cancelled");
                return;
            }
            next = upstream.next() => next,
        };

        match next {
            Some(Ok(bytes)) => {
                for chunk in normalizer.push(&bytes) {
                    if tx.send(chunk).await.is_err() {
                        ctx.log_stream_ended(sent, "cancelled");
                        return;
                    }
                    sent += 1;
                }
                if normalizer.is_done() {
                    break;
                }
            }
            Some(Err(e)) => {
                ctx.log_error(&e.to_string());
                if let Some(chunk) = normalizer.fail(format!("An error occurred: {}", e)) {
                    if tx.send(chunk).await.is_ok() {
                        sent += 1;
                    }
                }
                record_stream_chunks(&ctx.operation, sent);
                ctx.log_stream_ended(sent, "failed");
                return;
            }
            None => break,
        }
    }

    // Stop reading before announcing completion so the connection is released early.
    drop(upstream);

    if normalizer.skipped_frames() > 0 {
        debug!(
            trace_id = %ctx.trace_id,
            skipped = normalizer.skipped_frames(),
            "Skipped malformed stream frames"
        );
    }

    for chunk in normalizer.finish() {
        if tx.send(chunk).await.is_err() {
            ctx.log_stream_ended(sent, "cancelled");
            return;
        }
        sent += 1;
    }

    record_stream_chunks(&ctx.operation, sent);
    ctx.log_stream_ended(sent, "completed");
}
