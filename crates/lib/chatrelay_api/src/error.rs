//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chatrelay_core::RelayError;
use chatrelay_core::models::chat::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream request failed with status {status}")]
    Upstream { status: u16, body: String },

    #[error("Upstream unreachable: {0}")]
    Transport(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
            AppError::Upstream { body, .. } => (StatusCode::INTERNAL_SERVER_ERROR, body.clone()),
            AppError::Transport(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
            AppError::Internal(m) => {
                error!(error = %m, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
            details,
        });
        (status, body).into_response()
    }
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::Upstream { status, body } => AppError::Upstream { status, body },
            RelayError::Transport(msg) => AppError::Transport(msg),
            RelayError::Parse(msg) => AppError::Internal(msg),
        }
    }
}
