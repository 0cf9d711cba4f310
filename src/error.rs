use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;

/// Stable error taxonomy surfaced to callers. Retry policy is the caller's
/// concern; nothing here is retried by the engine.
#[derive(Debug, Display)]
pub enum ApiError {
    /// Missing or malformed input; the client must fix and retry.
    #[display(fmt = "{}", _0)]
    Validation(String),
    /// Duplicate start/end, duplicate holiday date; not retryable as-is.
    #[display(fmt = "{}", _0)]
    Conflict(String),
    /// Unknown id, or an id the actor is not allowed to see.
    #[display(fmt = "{}", _0)]
    NotFound(String),
    /// Role or hierarchy mismatch.
    #[display(fmt = "{}", _0)]
    Forbidden(String),
    /// Transition attempted from a terminal or wrong state.
    #[display(fmt = "{}", _0)]
    InvalidState(String),
    /// Storage or infrastructure failure; details stay in the logs.
    #[display(fmt = "Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        ApiError::InvalidState(msg.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "database error");
        ApiError::Internal(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::InvalidState(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
    }
}
