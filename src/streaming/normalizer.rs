//! Stream normalization state machine
//!
//! Consumes raw upstream bytes and produces [`NormalizedChunk`]s. The machine
//! has two states: `Reading` until a terminator, a finish signal or the end of
//! the upstream, then `Done`. Exactly one terminal chunk is produced per stream.

use serde::Deserialize;
use tracing::debug;

use super::SseLineBuffer;
use crate::envelope::NormalizedChunk;

/// Prefix of SSE data lines
const DATA_PREFIX: &str = "data:";
/// Payload terminating an upstream stream
const DONE_MARKER: &str = "[DONE]";

/// One upstream delta frame: `{choices:[{delta:{content?}, finish_reason}]}`
#[derive(Debug, Deserialize)]
struct DeltaFrame {
    choices: Vec<FrameChoice>,
}

#[derive(Debug, Deserialize)]
struct FrameChoice {
    #[serde(default)]
    delta: Option<FrameDelta>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FrameDelta {
    #[serde(default)]
    content: Option<String>,
}

/// A decoded upstream event line
#[derive(Debug, PartialEq)]
enum StreamEvent {
    Content(String),
    Finish,
    Terminator,
}

/// Normalizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizerState {
    /// Still consuming upstream lines
    Reading,
    /// Upstream finished; only the terminal chunk remains to be emitted
    Done,
    /// Terminal chunk emitted; nothing more will be produced
    Finished,
}

/// Per-request normalizer
#[derive(Debug)]
pub struct StreamNormalizer {
    lines: SseLineBuffer,
    accumulated: String,
    state: NormalizerState,
    skipped_frames: usize,
}

impl Default for StreamNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamNormalizer {
    pub fn new() -> Self {
        Self {
            lines: SseLineBuffer::new(),
            accumulated: String::new(),
            state: NormalizerState::Reading,
            skipped_frames: 0,
        }
    }

    pub fn state(&self) -> NormalizerState {
        self.state
    }

    /// Whether the upstream should no longer be read
    pub fn is_done(&self) -> bool {
        self.state != NormalizerState::Reading
    }

    /// Text accumulated so far
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    /// Number of frames skipped because they could not be parsed
    pub fn skipped_frames(&self) -> usize {
        self.skipped_frames
    }

    /// Feed one network read and return the content chunks it completes.
    ///
    /// Lines after the terminator or a finish signal are ignored, as is any
    /// input once the machine left `Reading`.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<NormalizedChunk> {
        if self.is_done() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        for line in self.lines.feed(bytes) {
            if let Some(chunk) = self.process_line(&line) {
                chunks.push(chunk);
            }
            if self.is_done() {
                break;
            }
        }
        chunks
    }

    /// Close the stream after the upstream ended or stopped being read.
    ///
    /// Decodes a trailing unterminated line first, then emits the terminal
    /// chunk. Returns nothing if the terminal chunk was already emitted.
    pub fn finish(&mut self) -> Vec<NormalizedChunk> {
        if self.state == NormalizerState::Finished {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        if self.state == NormalizerState::Reading {
            if let Some(line) = self.lines.take_remaining() {
                if let Some(chunk) = self.process_line(&line) {
                    chunks.push(chunk);
                }
            }
        }

        self.state = NormalizerState::Finished;
        chunks.push(NormalizedChunk::done(self.accumulated.clone()));
        chunks
    }

    /// Close the stream with a failure, e.g. when the upstream connection broke.
    ///
    /// Returns `None` if the terminal chunk was already emitted.
    pub fn fail(&mut self, message: impl Into<String>) -> Option<NormalizedChunk> {
        if self.state == NormalizerState::Finished {
            return None;
        }
        self.state = NormalizerState::Finished;
        Some(NormalizedChunk::failure(
            message,
            Some(self.accumulated.clone()),
        ))
    }

    fn process_line(&mut self, line: &str) -> Option<NormalizedChunk> {
        match self.decode(line)? {
            StreamEvent::Terminator | StreamEvent::Finish => {
                self.state = NormalizerState::Done;
                None
            }
            StreamEvent::Content(content) => {
                self.accumulated.push_str(&content);
                Some(NormalizedChunk::delta(content, self.accumulated.clone()))
            }
        }
    }

    /// Decode one line into an event. Non-data lines, frames without content
    /// and malformed frames yield `None`.
    fn decode(&mut self, line: &str) -> Option<StreamEvent> {
        let payload = line.strip_prefix(DATA_PREFIX)?;
        let payload = payload.strip_prefix(' ').unwrap_or(payload).trim_end();

        if payload == DONE_MARKER {
            return Some(StreamEvent::Terminator);
        }

        let frame = match serde_json::from_str::<DeltaFrame>(payload) {
            Ok(frame) => frame,
            Err(e) => {
                self.skipped_frames += 1;
                debug!(error = %e, payload_len = payload.len(), "Skipping malformed stream frame");
                return None;
            }
        };

        let Some(choice) = frame.choices.into_iter().next() else {
            self.skipped_frames += 1;
            debug!("Skipping stream frame without choices");
            return None;
        };

        // A finish signal ends the stream even if the frame also carries content.
        if choice.finish_reason.is_some() {
            return Some(StreamEvent::Finish);
        }

        choice.delta.and_then(|d| d.content).map(StreamEvent::Content)
    }
}
