//! Application error types, mapped to HTTP responses at the boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single field that failed validation.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Application-level errors, typed by code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("{field} already exists")]
    Conflict { field: String },

    #[error("{0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        AppError::Auth(message.into())
    }

    pub fn validation(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        AppError::Validation {
            message: message.into(),
            errors,
        }
    }

    /// Flatten `validator` output into a field-level error list.
    pub fn from_validation(e: validator::ValidationErrors) -> Self {
        let errors = e
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        AppError::Validation {
            message: "validation failed".to_string(),
            errors,
        }
    }

    /// Stable error code surfaced in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::Conflict { .. } => "CONFLICT_ERROR",
            AppError::Auth(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Translate driver errors into domain errors. A Postgres unique violation
/// becomes a conflict naming the offending column; everything else stays a
/// database error.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref dbe) = e {
            if dbe.code().as_deref() == Some("23505") {
                let field = dbe
                    .constraint()
                    .map(constraint_field)
                    .unwrap_or_else(|| "unique field".to_string());
                return AppError::Conflict { field };
            }
        }
        AppError::Database(e)
    }
}

/// Derive the column name from a constraint like `users_email_key`.
fn constraint_field(constraint: &str) -> String {
    let trimmed = constraint
        .trim_end_matches("_key")
        .trim_end_matches("_idx");
    match trimmed.split_once('_') {
        Some((_table, field)) if !field.is_empty() => field.to_string(),
        _ => trimmed.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Driver and internal details are logged, never returned to the caller.
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                "database operation failed".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                "an unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = match &self {
            AppError::Validation { errors, .. } => json!({
                "code": self.code(),
                "message": message,
                "errors": errors,
            }),
            _ => json!({
                "code": self.code(),
                "message": message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_field_strips_table_and_suffix() {
        assert_eq!(constraint_field("users_email_key"), "email");
        assert_eq!(constraint_field("todos_title_idx"), "title");
    }

    #[test]
    fn constraint_field_keeps_unrecognized_names() {
        assert_eq!(constraint_field("email"), "email");
    }

    #[test]
    fn conflict_codes() {
        let err = AppError::Conflict {
            field: "email".to_string(),
        };
        assert_eq!(err.code(), "CONFLICT_ERROR");
        assert_eq!(err.to_string(), "email already exists");
    }
}
