// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 400 Bad Request: missing or malformed request input.
    Validation(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., generation already running for a session)
    Conflict(String),

    // 422 Unprocessable Entity: finalize requested before every question was answered.
    IncompleteAnswers { answered: usize, total: usize },

    // 500: missing credentials or bad environment.
    Configuration(String),

    // 500: the model API failed, timed out or returned nothing.
    Upstream(String),

    // 500: the model answered but its output did not decode into questions.
    MalformedResponse(String),

    // 500: the data backend failed or timed out.
    Persistence(String),

    // 500 Internal Server Error
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "conflict: {}", msg),
            AppError::IncompleteAnswers { answered, total } => {
                write!(f, "incomplete answers: {} of {} answered", answered, total)
            }
            AppError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            AppError::Upstream(msg) => write!(f, "upstream error: {}", msg),
            AppError::MalformedResponse(msg) => write!(f, "malformed model response: {}", msg),
            AppError::Persistence(msg) => write!(f, "persistence error: {}", msg),
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::IncompleteAnswers { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Configuration(_)
            | AppError::Upstream(_)
            | AppError::MalformedResponse(_)
            | AppError::Persistence(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the client.
    /// Upstream and storage details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Configuration(msg) => msg.clone(),
            AppError::IncompleteAnswers { answered, total } => format!(
                "Answer every question before finalizing ({} of {} answered)",
                answered, total
            ),
            AppError::Upstream(_) | AppError::MalformedResponse(_) => {
                "Failed to generate a response from the model. Please try again.".to_string()
            }
            AppError::Persistence(_) => "Failed to access stored data".to_string(),
            AppError::Internal(_) => "Internal Server Error".to_string(),
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Configuration(msg) => tracing::error!("Configuration error: {}", msg),
            AppError::Upstream(msg) => tracing::error!("Upstream error: {}", msg),
            AppError::MalformedResponse(msg) => tracing::warn!("Malformed model response: {}", msg),
            AppError::Persistence(msg) => tracing::error!("Persistence error: {}", msg),
            AppError::Internal(msg) => tracing::error!("Internal Server Error: {}", msg),
            _ => {}
        }

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (self.status(), body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::Persistence`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Upstream(format!("request timed out: {}", err))
        } else {
            AppError::Upstream(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
