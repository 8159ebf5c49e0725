//! Prompt construction
//!
//! Turns a typed [`Operation`] into the conversation sent to the completion
//! endpoint: the system prompt, the caller's history (plain chat only) and one
//! freshly built user turn. Everything here is pure string construction.

use serde::{Deserialize, Serialize};

/// System prompt placed first in every conversation
pub const SYSTEM_PROMPT: &str = "Always respond in English. You are a professional email assistant who can:
1. Correct grammar and spelling errors in emails.
2. Adjust tone and style (formal, friendly, professional, etc.).
3. Suggest rewrites for clarity and impact.
4. Translate emails into different languages.
5. Provide email templates for various scenarios.
6. Summarize long emails into concise key points.
7. Generate emails for specific use cases based on simple instructions.

Understand the user's intent and reply helpfully, maintaining context across multiple turns.
";

/// Chat message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A fully resolved operation, ready for prompt construction
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Free-form chat; the message is forwarded without wrapping
    Chat {
        message: String,
        history: Vec<Message>,
    },
    /// Summary, grammar fixes, tone feedback and structure evaluation
    Analyze { email_content: String },
    /// Full rewrite honoring the requirements
    Rewrite {
        email_content: String,
        requirements: String,
    },
    /// Meaning and tone preserving translation
    Translate {
        email_content: String,
        target_language: String,
    },
    /// Complete email template with placeholder fields
    Template { scenario: String },
    /// Follow-up email for a previous email
    FollowUp {
        previous_email: String,
        instruction: String,
    },
}

impl Operation {
    /// Short name used in logs and metric labels
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Chat { .. } => "chat",
            Operation::Analyze { .. } => "analyze",
            Operation::Rewrite { .. } => "rewrite",
            Operation::Translate { .. } => "translate",
            Operation::Template { .. } => "template",
            Operation::FollowUp { .. } => "follow_up",
        }
    }

    /// Build the text of the user turn for this operation
    pub fn user_prompt(&self) -> String {
        match self {
            Operation::Chat { message, .. } => message.clone(),
            Operation::Analyze { email_content } => format!(
                "Please analyze the following email and provide:
1. A concise summary of its main points.
2. Corrections for any grammar or spelling errors.
3. Feedback on tone and style, with suggestions for improvement.
4. An evaluation of overall structure and clarity.

Email content:
{email_content}
"
            ),
            Operation::Rewrite {
                email_content,
                requirements,
            } => format!(
                "Please rewrite the following email according to these requirements:
Requirements: {requirements}

Original email:
{email_content}

Please provide the fully rewritten email.
"
            ),
            Operation::Translate {
                email_content,
                target_language,
            } => format!(
                "Please translate the following email into {target_language}, preserving its meaning and tone:

Original email:
{email_content}

Translation into {target_language}:
"
            ),
            Operation::Template { scenario } => format!(
                "Please generate a professional email template for the following scenario:
Scenario: {scenario}

Provide a complete email including a subject line and body. You may use placeholders like [Name], [Company], etc., for user-specific details.
"
            ),
            Operation::FollowUp {
                previous_email,
                instruction,
            } => format!(
                "Based on the following prior email and the instruction \"{instruction}\", please craft an appropriate follow-up email:

Previous email:
{previous_email}

Please provide a complete follow-up email including subject line and body.
"
            ),
        }
    }

    /// History forwarded ahead of the user turn (plain chat only)
    pub fn history(&self) -> &[Message] {
        match self {
            Operation::Chat { history, .. } => history,
            _ => &[],
        }
    }
}

/// Build the full conversation for an operation.
///
/// The system prompt is always first and appears exactly once; history is
/// forwarded as given; the constructed user turn is always last.
pub fn build_conversation(system_prompt: &str, operation: &Operation) -> Vec<Message> {
    let history = operation.history();
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt));
    messages.extend_from_slice(history);
    messages.push(Message::user(operation.user_prompt()));
    messages
}
