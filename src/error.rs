//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::repository::RepositoryError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
    #[error("either AUTH_JWT_PUBLIC_KEY or AUTH_JWT_SECRET must be set")]
    MissingAuthKey,
}

/// Errors a handler can return. Each variant maps to one status code and a fixed message.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Forbidden")]
    Forbidden,
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}

impl AppError {
    pub fn missing_fields() -> Self {
        AppError::Validation("Missing required fields".into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = if status.is_server_error() {
            // Logged inside the handler span; clients only see the generic message.
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}
