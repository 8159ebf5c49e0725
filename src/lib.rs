//! Courier - streaming relay for an email assistant
//!
//! Builds prompts for chat and email-editing operations, forwards them to an
//! OpenAI-compatible completion endpoint and returns the reply either as one
//! `{code, data, msg}` envelope or as a line-delimited stream of JSON chunks.

pub mod completion;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod prompt;
pub mod request;
pub mod routes;
pub mod streaming;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::completion::{CompletionClient, CompletionProvider, OpenAICompatProvider};
pub use crate::config::Config;
pub use crate::dispatch::Dispatcher;
pub use crate::envelope::{Envelope, NormalizedChunk};

use crate::completion::CompletionSettings;

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub start_time: Instant,
}

impl AppState {
    /// Create the application state with the HTTP completion provider
    pub fn new(config: Config) -> Result<Self> {
        // Per-request timeouts are applied by the provider.
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let provider: Arc<dyn CompletionProvider> =
            Arc::new(OpenAICompatProvider::new(http_client, &config)?);

        Ok(Self::with_provider(config, provider))
    }

    /// Create the application state around an explicit provider
    pub fn with_provider(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        let client = CompletionClient::new(provider, config.stream_channel_capacity);
        let dispatcher = Dispatcher::new(client, CompletionSettings::from_config(&config));

        Self {
            config,
            dispatcher,
            start_time: Instant::now(),
        }
    }
}
