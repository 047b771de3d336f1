mod conversions;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use muse_history::{HistoryError, ValidationError};
use muse_llm::GenerationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    History(HistoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Generation(GenerationError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Generation(GenerationError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Generation(GenerationError::AuthFailed(_))
            | AppError::Generation(GenerationError::Unknown(_)) => StatusCode::BAD_GATEWAY,
            AppError::History(HistoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::History(HistoryError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::History(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Generation failures are worth retrying from the client side.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Generation(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (
            status,
            Json(serde_json::json!({
                "error": self.to_string(),
                "retryable": self.is_retryable(),
            })),
        )
            .into_response()
    }
}
