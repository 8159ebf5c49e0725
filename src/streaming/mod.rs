//! SSE (Server-Sent Events) stream handling
//!
//! Turns the provider's `data: <json>` event stream into the normalized,
//! line-delimited chunk stream sent to callers:
//! - [`SseLineBuffer`] reassembles lines split across network reads
//! - [`StreamNormalizer`] is the per-request state machine producing chunks
//! - [`spawn_relay`] runs the normalizer in a producer task feeding a bounded channel

pub mod normalizer;
pub mod relay;

pub use normalizer::{NormalizerState, StreamNormalizer};
pub use relay::{spawn_relay, ChunkStream};

/// Buffer for accumulating incomplete SSE lines across chunk boundaries.
///
/// Network reads do not align with line boundaries, and a multi-byte UTF-8
/// character may be split between two reads. Bytes are held until a complete
/// line (ending with `\n`) is available and only then decoded.
///
/// # Example
/// ```
/// use courier::streaming::SseLineBuffer;
///
/// let mut buffer = SseLineBuffer::new();
///
/// // First chunk contains partial line
/// let lines1 = buffer.feed(b"data: {\"content\":\"hel");
/// assert!(lines1.is_empty()); // No complete lines yet
///
/// // Second chunk completes the line
/// let lines2 = buffer.feed(b"lo\"}\n");
/// assert_eq!(lines2, vec!["data: {\"content\":\"hello\"}"]);
/// ```
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    /// Accumulated bytes of the incomplete trailing line
    incomplete: Vec<u8>,
}

impl SseLineBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self {
            incomplete: Vec::new(),
        }
    }

    /// Feed bytes into the buffer and return any complete, non-blank lines.
    ///
    /// Line terminators (`\n` or `\r\n`) are stripped. Incomplete trailing data
    /// is retained in the buffer for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.incomplete.extend_from_slice(bytes);

        let mut complete_lines = Vec::new();
        let mut start = 0;

        while let Some(offset) = self.incomplete[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            if let Some(line) = decode_line(&self.incomplete[start..end]) {
                complete_lines.push(line);
            }
            start = end + 1;
        }

        self.incomplete.drain(..start);
        complete_lines
    }

    /// Take the trailing unterminated line, if any.
    ///
    /// Call this at end of stream: an upstream may close the connection right
    /// after its last frame without a final newline.
    pub fn take_remaining(&mut self) -> Option<String> {
        let remaining = std::mem::take(&mut self.incomplete);
        decode_line(&remaining)
    }
}

/// Decode one raw line, dropping a trailing `\r`. Blank lines yield `None`.
fn decode_line(raw: &[u8]) -> Option<String> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = String::from_utf8_lossy(raw);
    if line.trim().is_empty() {
        None
    } else {
        Some(line.into_owned())
    }
}
