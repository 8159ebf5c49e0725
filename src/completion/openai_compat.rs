//! OpenAI-compatible completion provider
//!
//! Posts chat completion requests to a single configured endpoint URL (for
//! example DeepSeek's `/v1/chat/completions`).

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tracing::warn;

use super::headers::build_default_headers;
use super::request::CompletionResponse;
use super::{ByteStream, CompletionProvider, CompletionRequest, RequestContext};
use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Provider speaking the OpenAI chat completions protocol
pub struct OpenAICompatProvider {
    client: reqwest::Client,
    url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl OpenAICompatProvider {
    /// Create a new provider from configuration
    pub fn new(client: reqwest::Client, config: &Config) -> Result<Self> {
        Ok(Self {
            client,
            url: config.completion_api_url.clone(),
            headers: build_default_headers(&config.completion_api_key)?,
            timeout: config.request_timeout,
        })
    }

    /// Endpoint URL requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the request and fail on a non-success status
    async fn send(&self, request: &CompletionRequest, ctx: &RequestContext) -> AppResult<reqwest::Response> {
        ctx.log_upstream_request(&self.url);

        let response = self
            .client
            .post(&self.url)
            .headers(self.headers.clone())
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        ctx.log_upstream_response(status.as_u16());

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(
                        trace_id = %ctx.trace_id,
                        status = %status.as_u16(),
                        error = %e,
                        "Failed to read error body from completion endpoint"
                    );
                    return Err(AppError::Transport(e));
                }
            };
            warn!(
                trace_id = %ctx.trace_id,
                status = %status.as_u16(),
                body_len = body.len(),
                "Completion endpoint returned an error status"
            );
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionProvider for OpenAICompatProvider {
    fn name(&self) -> &'static str {
        "openai-compat"
    }

    async fn complete(&self, request: &CompletionRequest, ctx: &RequestContext) -> AppResult<String> {
        let response = self.send(request, ctx).await?;

        let body = response.bytes().await?;
        let parsed: CompletionResponse = serde_json::from_slice(&body).map_err(|e| {
            AppError::MalformedResponse(format!("Invalid completion response: {}", e))
        })?;

        parsed.into_reply().ok_or_else(|| {
            AppError::MalformedResponse("Completion response has no choices[0].message.content".to_string())
        })
    }

    async fn open_stream(
        &self,
        request: &CompletionRequest,
        ctx: &RequestContext,
    ) -> AppResult<ByteStream> {
        let response = self.send(request, ctx).await?;
        Ok(Box::pin(response.bytes_stream()))
    }
}
