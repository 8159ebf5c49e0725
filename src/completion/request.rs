//! Outbound request and response types
//!
//! [`CompletionRequest`] doubles as the wire body posted to the endpoint:
//! `{model, messages, temperature, max_tokens, stream}`.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::prompt::{build_conversation, Message, Operation};

/// Model parameters shared by every outbound request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub system_prompt: String,
}

impl CompletionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
        }
    }
}

/// One outbound completion call.
///
/// Fields are private so a request cannot change after construction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

impl CompletionRequest {
    /// Build the request for an operation: conversation plus model parameters
    pub fn for_operation(operation: &Operation, settings: &CompletionSettings, stream: bool) -> Self {
        Self {
            model: settings.model.clone(),
            messages: build_conversation(&settings.system_prompt, operation),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            stream,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

}

/// Buffered completion response; only the reply text is used
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    pub message: ReplyMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice, if present
    pub fn into_reply(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}
