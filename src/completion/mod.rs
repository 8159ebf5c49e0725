//! Completion client module
//!
//! Handles request construction and forwarding to the upstream completion
//! endpoint, in buffered or streaming mode.

pub mod client;
pub mod headers;
pub mod logging;
pub mod openai_compat;
pub mod provider;
pub mod request;

pub use client::CompletionClient;
pub use logging::RequestContext;
pub use openai_compat::OpenAICompatProvider;
pub use provider::{ByteStream, CompletionProvider};
pub use request::{CompletionRequest, CompletionSettings};
