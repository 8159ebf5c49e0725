//! Configuration management for Courier
//!
//! Configuration is loaded from environment variables once at startup and is
//! read-only afterwards.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::prompt::SYSTEM_PROMPT;

/// Default completion endpoint (OpenAI-compatible chat completions)
pub const DEFAULT_COMPLETION_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
/// Default model identifier
pub const DEFAULT_MODEL: &str = "deepseek-chat";
/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Default maximum number of output tokens
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: String,

    /// Full URL of the chat completions endpoint
    pub completion_api_url: String,
    /// API key sent as a bearer token to the completion endpoint
    pub completion_api_key: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Sampling temperature sent with every request
    pub temperature: f64,
    /// Maximum output tokens sent with every request
    pub max_tokens: u32,
    /// System prompt placed first in every conversation
    pub system_prompt: String,

    /// Timeout applied to each outbound request (covers the whole stream)
    pub request_timeout: Duration,
    /// Timeout for establishing the outbound connection
    pub connect_timeout: Duration,
    /// Capacity of the channel between the stream producer and the response body
    pub stream_channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            host: var("COURIER_HOST", "0.0.0.0"),
            port: var("COURIER_PORT", "8000")
                .parse()
                .context("Invalid COURIER_PORT")?,
            static_dir: var("COURIER_STATIC_DIR", "static"),

            completion_api_url: var("COMPLETION_API_URL", DEFAULT_COMPLETION_API_URL),
            completion_api_key: lookup("COMPLETION_API_KEY")
                .filter(|key| !key.trim().is_empty())
                .context("COMPLETION_API_KEY must be set")?,
            model: var("COMPLETION_MODEL", DEFAULT_MODEL),
            temperature: var("COMPLETION_TEMPERATURE", &DEFAULT_TEMPERATURE.to_string())
                .parse()
                .context("Invalid COMPLETION_TEMPERATURE")?,
            max_tokens: var("COMPLETION_MAX_TOKENS", &DEFAULT_MAX_TOKENS.to_string())
                .parse()
                .context("Invalid COMPLETION_MAX_TOKENS")?,
            system_prompt: var("COURIER_SYSTEM_PROMPT", SYSTEM_PROMPT),

            request_timeout: Duration::from_secs(
                var("COMPLETION_TIMEOUT_SECONDS", "300")
                    .parse()
                    .context("Invalid COMPLETION_TIMEOUT_SECONDS")?,
            ),
            connect_timeout: Duration::from_secs(
                var("COMPLETION_CONNECT_TIMEOUT_SECONDS", "10")
                    .parse()
                    .context("Invalid COMPLETION_CONNECT_TIMEOUT_SECONDS")?,
            ),
            stream_channel_capacity: var("STREAM_CHANNEL_CAPACITY", "32")
                .parse()
                .context("Invalid STREAM_CHANNEL_CAPACITY")?,
        })
    }
}
