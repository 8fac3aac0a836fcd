/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts to
/// the appropriate HTTP status code and body.
///
/// # Response shapes
///
/// - `Validation`: 400 with a `{field: [messages]}` JSON body
/// - `NotFound`: 404 with an empty body
/// - `NotFoundMessage`: 404 with an `{"error": "..."}` JSON body
/// - everything else: a `{error, message}` JSON envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400), non-field errors such as a malformed body
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404), empty body
    NotFound,

    /// Not found (404) with an `{"error": ...}` payload
    NotFoundMessage(String),

    /// Validation failure (400) with per-field messages
    Validation(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl ValidationErrorDetail {
    /// Convenience constructor
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response format for non-field errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound => write!(f, "Not found"),
            ApiError::NotFoundMessage(msg) => write!(f, "Not found: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Groups per-field errors into the `{field: [messages]}` wire shape
fn validation_body(errors: &[ValidationErrorDetail]) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    for error in errors {
        body.entry(error.field.clone())
            .or_insert_with(|| serde_json::Value::Array(Vec::new()))
            .as_array_mut()
            .expect("validation body entries are arrays")
            .push(serde_json::Value::String(error.message.clone()));
    }
    serde_json::Value::Object(body)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(validation_body(&errors))).into_response()
            }
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::NotFoundMessage(msg) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "bad_request".to_string(),
                    message: msg,
                }),
            )
                .into_response(),
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "unauthorized".to_string(),
                    message: msg,
                }),
            )
                .into_response(),
            ApiError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: "forbidden".to_string(),
                    message: msg,
                }),
            )
                .into_response(),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "internal_error".to_string(),
                        message: "An internal error occurred".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Maps a foreign-key constraint name onto the wire field it guards
fn foreign_key_field(constraint: &str) -> Option<&'static str> {
    match constraint {
        "projects_owner_id_fkey" => Some("owner"),
        "project_members_project_id_fkey" | "tasks_project_id_fkey" => Some("project"),
        "project_members_user_id_fkey" | "comments_user_id_fkey" => Some("user"),
        "tasks_assigned_to_fkey" => Some("assigned_to"),
        "comments_task_id_fkey" => Some("task"),
        _ => None,
    }
}

/// Convert sqlx errors to API errors
///
/// Reference violations surface as per-field validation errors so that a
/// write naming a nonexistent user/project/task answers 400 with the
/// offending field, not a bare 500.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().map(str::to_owned);

                match db_err.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => {
                        if constraint.as_deref() == Some("users_username_key") {
                            return ApiError::Validation(vec![ValidationErrorDetail::new(
                                "username",
                                "A user with that username already exists.",
                            )]);
                        }
                        ApiError::BadRequest(format!(
                            "Constraint violation: {}",
                            constraint.as_deref().unwrap_or("unknown")
                        ))
                    }
                    sqlx::error::ErrorKind::ForeignKeyViolation => {
                        if let Some(field) = constraint.as_deref().and_then(foreign_key_field) {
                            return ApiError::Validation(vec![ValidationErrorDetail::new(
                                field,
                                "Invalid reference: object does not exist.",
                            )]);
                        }
                        ApiError::BadRequest("Invalid reference".to_string())
                    }
                    _ => ApiError::InternalError(format!("Database error: {}", db_err)),
                }
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<taskboard_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskboard_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<taskboard_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: taskboard_shared::auth::jwt::JwtError) -> Self {
        match err {
            taskboard_shared::auth::jwt::JwtError::Expired => {
                ApiError::Unauthorized("Token expired".to_string())
            }
            taskboard_shared::auth::jwt::JwtError::InvalidIssuer => {
                ApiError::Unauthorized("Invalid token issuer".to_string())
            }
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}
