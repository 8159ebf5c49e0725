//! Inbound request bodies
//!
//! One struct per endpoint, validated by serde at the HTTP boundary. Each body
//! converts into a typed [`Operation`] through [`OperationRequest`].

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::dispatch::resolve_chat;
use crate::prompt::{Message, Operation};

/// A request body that resolves to exactly one operation
pub trait OperationRequest: Send + 'static {
    /// Whether the caller asked for a streamed reply
    fn wants_stream(&self) -> bool;

    /// Resolve into the operation to execute
    fn into_operation(self) -> Operation;
}

/// `POST /chat` body.
///
/// `action` and `parameters` optionally select one of the templated operations;
/// anything unknown or incomplete runs as plain chat with `message`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Option<Vec<Message>>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub stream: Option<bool>,
}

impl ChatRequest {
    /// Parameter value as text; missing and `null` are treated alike
    pub fn parameter(&self, name: &str) -> Option<String> {
        match self.parameters.as_ref()?.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl OperationRequest for ChatRequest {
    fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }

    fn into_operation(self) -> Operation {
        resolve_chat(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub email_content: String,
    #[serde(default)]
    pub stream: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRequest {
    pub email_content: String,
    pub requirements: String,
    #[serde(default)]
    pub stream: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateRequest {
    pub email_content: String,
    pub target_language: String,
    #[serde(default)]
    pub stream: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateRequest {
    pub scenario: String,
    #[serde(default)]
    pub stream: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowUpRequest {
    pub previous_email: String,
    pub instruction: String,
    #[serde(default)]
    pub stream: Option<bool>,
}

impl OperationRequest for AnalyzeRequest {
    fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }

    fn into_operation(self) -> Operation {
        Operation::Analyze {
            email_content: self.email_content,
        }
    }
}

impl OperationRequest for RewriteRequest {
    fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }

    fn into_operation(self) -> Operation {
        Operation::Rewrite {
            email_content: self.email_content,
            requirements: self.requirements,
        }
    }
}

impl OperationRequest for TranslateRequest {
    fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }

    fn into_operation(self) -> Operation {
        Operation::Translate {
            email_content: self.email_content,
            target_language: self.target_language,
        }
    }
}

impl OperationRequest for TemplateRequest {
    fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }

    fn into_operation(self) -> Operation {
        Operation::Template {
            scenario: self.scenario,
        }
    }
}

impl OperationRequest for FollowUpRequest {
    fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }

    fn into_operation(self) -> Operation {
        Operation::FollowUp {
            previous_email: self.previous_email,
            instruction: self.instruction,
        }
    }
}
