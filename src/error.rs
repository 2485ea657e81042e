use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::pricing::PricingError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request failed validation (missing field, bad format, out-of-range value)
    #[error("Validation error: {0}")]
    Validation(String),
    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),
    /// Operation would break a uniqueness or referential rule
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} '{}' not found", kind, id))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(err) if is_unique_violation(err) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Validation(msg) | Self::NotFound(msg) | Self::Conflict(msg) => msg.clone(),
            Self::Database(err) if is_unique_violation(err) => {
                "Record conflicts with an existing one".to_string()
            }
            Self::Database(err) => {
                tracing::error!(error = %err, "Database error while handling request");
                "Internal database error".to_string()
            }
            Self::Config(msg) | Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error while handling request");
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::Validation(_) => "validation_error",
        AppError::NotFound(_) => "not_found",
        AppError::Conflict(_) => "conflict",
        AppError::Database(err) if is_unique_violation(err) => "conflict",
        AppError::Database(_) => "database_error",
        AppError::Config(_) => "config_error",
        AppError::Internal(_) => "internal_error",
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
