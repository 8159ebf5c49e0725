//! Operation dispatch
//!
//! Resolves chat requests into operations and routes each operation to the
//! buffered or streaming completion path.

use tracing::warn;

use crate::completion::{CompletionClient, CompletionRequest, CompletionSettings};
use crate::envelope::Envelope;
use crate::prompt::Operation;
use crate::request::ChatRequest;
use crate::streaming::ChunkStream;

/// Resolve a chat body into an operation.
///
/// A known `action` with all of its parameters present selects the templated
/// operation. Any other combination degrades to plain chat with the original
/// message and history; this never fails.
pub fn resolve_chat(request: ChatRequest) -> Operation {
    let Some(action) = request.action.as_deref() else {
        return plain_chat(request);
    };

    match select_action(action, &request) {
        Some(operation) => operation,
        None => {
            warn!(
                action = %action,
                "Unknown action or missing parameters, falling back to plain chat"
            );
            plain_chat(request)
        }
    }
}

fn select_action(action: &str, request: &ChatRequest) -> Option<Operation> {
    let param = |name: &str| request.parameter(name);

    match action {
        "analyze" => Some(Operation::Analyze {
            email_content: param("email_content")?,
        }),
        "rewrite" => Some(Operation::Rewrite {
            email_content: param("email_content")?,
            requirements: param("requirements")?,
        }),
        "translate" => Some(Operation::Translate {
            email_content: param("email_content")?,
            target_language: param("target_language")?,
        }),
        "template" => Some(Operation::Template {
            scenario: param("scenario")?,
        }),
        "follow_up" => Some(Operation::FollowUp {
            previous_email: param("previous_email")?,
            instruction: param("instruction")?,
        }),
        _ => None,
    }
}

fn plain_chat(request: ChatRequest) -> Operation {
    Operation::Chat {
        message: request.message,
        history: request.history.unwrap_or_default(),
    }
}

/// Runs resolved operations against the completion client
#[derive(Clone)]
pub struct Dispatcher {
    client: CompletionClient,
    settings: CompletionSettings,
}

impl Dispatcher {
    pub fn new(client: CompletionClient, settings: CompletionSettings) -> Self {
        Self { client, settings }
    }

    /// Name of the provider serving completions
    pub fn provider_name(&self) -> &'static str {
        self.client.provider_name()
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// Buffered execution; always returns one envelope
    pub async fn execute(&self, operation: Operation) -> Envelope {
        let request = CompletionRequest::for_operation(&operation, &self.settings, false);
        self.client.complete(&request, operation.name()).await
    }

    /// Streaming execution; the stream always ends with a `done` chunk
    pub async fn stream(&self, operation: Operation) -> ChunkStream {
        let request = CompletionRequest::for_operation(&operation, &self.settings, true);
        self.client.complete_streaming(&request, operation.name()).await
    }
}
