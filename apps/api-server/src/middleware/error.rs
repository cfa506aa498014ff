//! Error handling - maps failures onto the JSON envelope.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use quill_core::error::{RepoError, ValidationError};
use quill_shared::ApiResponse;
use std::fmt;

/// Application-level error type rendered as `{success: false, message}`.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// `message` is sent to the client; `detail` is only logged.
    Internal { message: String, detail: String },
}

impl AppError {
    pub fn internal(message: impl Into<String>, detail: impl fmt::Display) -> Self {
        AppError::Internal {
            message: message.into(),
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal { message, detail } => {
                write!(f, "Internal error: {}: {}", message, detail)
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound(message) | AppError::BadRequest(message) => {
                ApiResponse::failure(message.as_str())
            }
            AppError::Internal { message, detail } => {
                tracing::error!(detail = %detail, "{}", message);
                ApiResponse::failure(message.as_str())
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.message)
    }
}

/// Attach an operation-specific message to store failures.
pub trait RepoResultExt<T> {
    /// Any failure becomes a 500 carrying `message`.
    fn or_internal(self, message: &str) -> AppResult<T>;

    /// `NotFound` becomes a 404 carrying `not_found`; anything else a 500.
    fn or_not_found(self, not_found: &str, message: &str) -> AppResult<T>;
}

impl<T> RepoResultExt<T> for Result<T, RepoError> {
    fn or_internal(self, message: &str) -> AppResult<T> {
        self.map_err(|err| AppError::internal(message, err))
    }

    fn or_not_found(self, not_found: &str, message: &str) -> AppResult<T> {
        self.map_err(|err| match err {
            RepoError::NotFound => AppError::NotFound(not_found.to_string()),
            other => AppError::internal(message, other),
        })
    }
}

/// Turn extractor failures (bad JSON, bad query string) into envelope 400s.
pub fn bad_request_handler<E: fmt::Display>(err: E, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
