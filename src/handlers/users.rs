//! User CRUD Handlers
//!
//! Thin passthrough from the REST surface to the user store. Records created
//! here carry no credential; accounts with a password come in through signup.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{CreateUserRequest, MessageResponse, UpdateUserRequest, UserResponse};
use crate::AppState;

/// GET /api/users - List all users, ascending by id
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.store.list().await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /api/users/:id - Get a single user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(UserResponse::from(user)))
}

/// POST /api/users - Create a user without a credential
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let user = state.store.create(&input.name, &input.email, None).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// PUT /api/users/:id - Update name and email
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let user = state
        .store
        .update(id, &input.name, &input.email)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/users/:id - Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store.delete(id).await? {
        return Err(ApiError::UserNotFound);
    }

    Ok(Json(MessageResponse::new("User deleted")))
}
