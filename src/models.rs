//! Models
//!
//! Data structures for request/response DTOs, the user entity, and JWT claims.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// ============================================
// Database Entities
// ============================================

/// User entity from database
///
/// `password_hash` is absent for records created before authentication existed
/// (seed data included) and is never serialized to clients.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
}

impl User {
    /// Check if this account has a credential and can log in
    pub fn has_credential(&self) -> bool {
        self.password_hash.is_some()
    }
}

// ============================================
// Request DTOs
// ============================================

// String fields default to empty so a missing field fails validation with a
// 400 instead of a body-decode rejection.

/// Signup request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Create user request (direct record creation, no credential)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Update user request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

// ============================================
// Response DTOs
// ============================================

/// Public user projection (never includes the credential hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Simple message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================
// JWT Claims
// ============================================

/// JWT claims embedded in every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: i64,
    /// User email
    pub email: String,
    /// User name
    pub name: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}
