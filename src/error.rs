// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.
//!
//! Every variant maps to a fixed HTTP status and the uniform
//! `{success: false, error: ...}` envelope the PWA consumes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    /// Signup with an email that already has an account.
    #[error("An account with this email already exists")]
    DuplicateEmail,

    /// PIN is not exactly 4 numeric digits.
    #[error("PIN must be exactly 4 digits")]
    InvalidPin,

    /// Login credential mismatch. Also used for unknown-email logins at the
    /// HTTP boundary so responses do not reveal whether the email exists.
    #[error("Invalid email or PIN")]
    InvalidCredentials,

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Caller already belongs to a space; create/join is a one-way transition.
    #[error("User is already in a space")]
    AlreadyInSpace,

    /// Space code is not 6 characters of A-Z/0-9 after normalization.
    #[error("Space code must be 6 letters or digits")]
    InvalidCodeFormat,

    /// No active space holds this code.
    #[error("No space found for this code")]
    SpaceNotFound,

    /// Bounded code-regeneration retries spent without an unclaimed code.
    #[error("Could not allocate a unique space code")]
    CodeSpaceExhausted,

    /// Authorization denial. Distinct from NotFound so callers can tell
    /// "nothing shared with you" from "you touched someone else's resource".
    #[error("Access denied")]
    Forbidden,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error envelope body (the `success: false` half of the API envelope).
#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail | AppError::AlreadyInSpace => StatusCode::CONFLICT,
            AppError::InvalidPin | AppError::InvalidCodeFormat | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) | AppError::SpaceNotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::CodeSpaceExhausted => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Backend detail is logged above, never sent to the client.
        let message = match &self {
            AppError::Database(_) => "internal error".to_string(),
            AppError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorEnvelope {
            success: false,
            error: message,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
