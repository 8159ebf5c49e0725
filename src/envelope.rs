//! Uniform response shapes
//!
//! Buffered operations answer with an [`Envelope`]; streaming operations answer
//! with a sequence of newline-terminated [`NormalizedChunk`] records.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Status code carried by successful envelopes and chunks
pub const SUCCESS_CODE: u16 = 200;
/// Local failure code used for every upstream or transport failure
pub const FAILURE_CODE: u16 = 400;
/// Message carried by successful envelopes and chunks
pub const SUCCESS_MSG: &str = "Success";

/// The `{code, data, msg}` envelope returned by every buffered operation.
///
/// This is also the result type of a buffered completion call: `data` holds the
/// reply text on success and is `null` on failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub code: u16,
    pub data: Option<String>,
    pub msg: String,
}

impl Envelope {
    /// Successful result carrying the reply text
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            code: SUCCESS_CODE,
            data: Some(data.into()),
            msg: SUCCESS_MSG.to_string(),
        }
    }

    /// Failure result with the local failure code
    pub fn failure(msg: impl Into<String>) -> Self {
        Self::failure_with_code(FAILURE_CODE, msg)
    }

    /// Failure result with an explicit code
    pub fn failure_with_code(code: u16, msg: impl Into<String>) -> Self {
        Self {
            code,
            data: None,
            msg: msg.into(),
        }
    }
}

/// One record of a normalized stream.
///
/// `data` is the incremental delta text and `full` the text accumulated so far.
/// The last record of every stream has `done == true`; successful streams end
/// with an empty `data`, failed streams with `data == null` and the error in `msg`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedChunk {
    pub code: u16,
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    pub msg: String,
    pub done: bool,
}

impl NormalizedChunk {
    /// Content chunk carrying one delta and the running total
    pub fn delta(delta: impl Into<String>, accumulated: impl Into<String>) -> Self {
        Self {
            code: SUCCESS_CODE,
            data: Some(delta.into()),
            full: Some(accumulated.into()),
            msg: SUCCESS_MSG.to_string(),
            done: false,
        }
    }

    /// Terminal chunk of a successful stream
    pub fn done(accumulated: impl Into<String>) -> Self {
        Self {
            code: SUCCESS_CODE,
            data: Some(String::new()),
            full: Some(accumulated.into()),
            msg: SUCCESS_MSG.to_string(),
            done: true,
        }
    }

    /// Terminal chunk of a failed stream
    pub fn failure(msg: impl Into<String>, accumulated: Option<String>) -> Self {
        Self {
            code: FAILURE_CODE,
            data: None,
            full: accumulated,
            msg: msg.into(),
            done: true,
        }
    }

    /// Delta text of this chunk, empty for failures
    pub fn delta_text(&self) -> &str {
        self.data.as_deref().unwrap_or_default()
    }

    /// Accumulated text at this point of the stream
    pub fn accumulated_text(&self) -> &str {
        self.full.as_deref().unwrap_or_default()
    }

    /// Serialize as one line of the downstream body (JSON followed by `\n`)
    pub fn to_line(&self) -> Bytes {
        // Plain strings, integers and bools only; serialization cannot fail.
        let mut line = serde_json::to_vec(self).unwrap_or_default();
        line.push(b'\n');
        Bytes::from(line)
    }
}
