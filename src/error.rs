//! Error types for the marketplace service.
//!
//! Uses thiserror for ergonomic error definitions that integrate
//! with axum's response system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Client errors
    #[error("{0}")]
    InvalidInput(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("{0}")]
    NotFound(String),

    // File errors
    #[error("File too large: max {max_size} bytes")]
    FileTooLarge { max_size: usize },

    #[error("File not found: {0}")]
    FileNotFound(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400
            Self::InvalidInput(_) | Self::CategoryNotFound(_) => StatusCode::BAD_REQUEST,

            // 404
            Self::NotFound(_) | Self::FileNotFound(_) => StatusCode::NOT_FOUND,

            // 413
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,

            // 500
            Self::Database(_)
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(code, "{}", message);
        } else {
            tracing::debug!(code, status = status.as_u16(), "{}", message);
        }

        let body = Json(json!({
            "code": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}
