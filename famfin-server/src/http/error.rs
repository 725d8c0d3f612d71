//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with a `detail` member: a string
//! for 404/405/500 and a list of `{loc, msg, type}` objects for 422.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::{ValidationError, ValidationErrors};

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (422)
    Validation(ValidationErrors),

    /// Resource or route not found (404)
    NotFound { message: String },

    /// Verb not supported on this path (405)
    MethodNotAllowed,

    /// Database error (500, logged)
    Database(DbError),
}

/// One entry of a 422 `detail` list
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl From<&ValidationError> for ErrorDetail {
    fn from(e: &ValidationError) -> Self {
        Self {
            loc: e.loc(),
            msg: e.to_string(),
            kind: e.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(errors) => {
                let detail: Vec<ErrorDetail> = errors.errors().iter().map(ErrorDetail::from).collect();
                tracing::debug!(%errors, "request rejected");
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "detail": detail }))
            }
            Self::NotFound { message } => (StatusCode::NOT_FOUND, json!({ "detail": message })),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "detail": "Method Not Allowed" }),
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        Self::Validation(e)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.into())
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, .. } => Self::NotFound {
                message: format!("{} not found", resource),
            },
            _ => Self::Database(e),
        }
    }
}
