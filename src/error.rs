// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Answer-set rules a mutation would break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("A question can hold at most {max} answers")]
    TooManyAnswers { max: usize },

    #[error("A question must keep more than {floor} answers")]
    TooFewAnswers { floor: usize },

    #[error("A question must have exactly one correct answer (found {found})")]
    InvalidCorrectCount { found: i64 },
}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    // 500 Internal Server Error
    #[error("{0}")]
    InternalServerError(String),

    // 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    // 401 Unauthorized (missing, invalid or unverified identity)
    #[error("{0}")]
    AuthError(String),

    // 403 Forbidden (authenticated, but not the quiz owner)
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 409 Conflict (e.g., duplicate username)
    #[error("{0}")]
    Conflict(String),

    // 422 Unprocessable Entity
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    // 422 Unprocessable Entity
    #[error("Unanswered questions: {0:?}")]
    IncompleteSubmission(Vec<i64>),

    // 422 Unprocessable Entity
    #[error("Quiz has no questions to grade")]
    EmptyQuiz,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Invariant(_) | AppError::IncompleteSubmission(_) | AppError::EmptyQuiz => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        let body = match &self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                json!({ "error": "Internal Server Error" })
            }
            AppError::IncompleteSubmission(missing) => json!({
                "error": message,
                "missing_question_ids": missing,
            }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
