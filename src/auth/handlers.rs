//! Authentication HTTP Handlers
//!
//! REST endpoints for signup, login, and the current-user probe.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, SignupRequest, UserResponse};
use crate::AppState;

/// POST /auth/signup
///
/// Create a new account with a hashed credential
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let user = state.auth.signup(req).await?;

    tracing::info!(user_id = user.id, "user signed up");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /auth/login
///
/// Verify credentials and return a signed token with the public user projection
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let response = state.auth.login(req).await?;

    Ok(Json(response))
}

/// GET /auth/me
///
/// Return the authenticated user's identity as decoded from the token
pub async fn me(user: AuthUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email
        }
    }))
}
