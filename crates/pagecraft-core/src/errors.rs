//! Application error type shared by every handler and service.
//!
//! `AppError` pairs an HTTP status with an [`anyhow::Error`]. Client errors
//! (4xx) echo the error message back as `{"error": "..."}`; server errors are
//! logged and replaced by a generic message so internals never leak.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::file_storage::StorageError;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow::anyhow!(message))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }

    /// Classifies a database error: missing rows become 404, unique and
    /// foreign-key violations become 400, everything else is a 500.
    pub fn database(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => {
                Self::not_found(anyhow::anyhow!("Resource not found"))
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let detail = match db_err.constraint() {
                    Some(constraint) => format!("Duplicate key violates '{constraint}'"),
                    None => "Duplicate key".to_string(),
                };
                Self::bad_request(anyhow::anyhow!(detail))
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                Self::bad_request(anyhow::anyhow!("Referenced resource does not exist"))
            }
            _ => Self::internal(err),
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.is_server_error() {
            tracing::error!(status = %self.status, error = ?self.error, "request failed");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        (self.status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::unprocessable(anyhow::anyhow!("Validation error: {err}"))
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidFileSize { .. } => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, err)
            }
            StorageError::InvalidMimeType { .. } => {
                Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, err)
            }
            StorageError::InvalidKey(_) => Self::bad_request(err),
            StorageError::NotFound => Self::not_found(err),
            StorageError::Io(_) => Self::internal(err),
        }
    }
}
