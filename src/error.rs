//! API Error Types
//!
//! Centralized error handling for all request paths. Every variant maps to a
//! status code and a JSON `{"message": ...}` body; storage failures are logged
//! server-side and never leak internal detail to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::store::StoreError;

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already in use")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization format")]
    MalformedAuthHeader,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::EmailTaken => StatusCode::CONFLICT,
            ApiError::InvalidCredentials
            | ApiError::MissingAuthHeader
            | ApiError::MalformedAuthHeader
            | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            ApiError::Database(_) | ApiError::Internal => "Server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation => ApiError::EmailTaken,
            StoreError::ColumnMissing => {
                tracing::error!("credential column missing past startup self-heal");
                ApiError::Database("missing column".to_string())
            }
            StoreError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ApiError::Database(e.to_string())
            }
        }
    }
}

impl From<argon2::password_hash::Error> for ApiError {
    fn from(err: argon2::password_hash::Error) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        ApiError::Internal
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        // expired vs. tampered stays visible in logs, callers see one outcome
        tracing::debug!("JWT validation failed: {:?}", err.kind());
        ApiError::InvalidToken
    }
}
