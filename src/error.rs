//! Error types for Courier
//!
//! Every error renders into the failure [`Envelope`], so callers always receive
//! the same response shape whatever went wrong.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::envelope::Envelope;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Connection, DNS, timeout or body read failure talking to the provider
    #[error("An error occurred: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("API request failed: {status}, {body}")]
    Upstream { status: u16, body: String },

    /// Provider answered with a success status but an unusable body
    #[error("An error occurred: {0}")]
    MalformedResponse(String),

    /// Request body could not be decoded into the expected shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Convert into the failure envelope carried back to the caller
    pub fn into_envelope(self) -> Envelope {
        match self {
            AppError::InvalidBody(_) => {
                Envelope::failure_with_code(StatusCode::UNPROCESSABLE_ENTITY.as_u16(), self.to_string())
            }
            other => Envelope::failure(other.to_string()),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            // Failures are reported inside the envelope, not through the HTTP status.
            _ => StatusCode::OK,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.into_envelope())).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
