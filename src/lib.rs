//! Userbase - user management REST API
//!
//! A minimal user-management service providing:
//! - CRUD endpoints over a `users` table in an embedded SQLite store
//! - Signup and login with Argon2id password hashing
//! - JWT bearer authentication guarding mutating endpoints
//! - Idempotent schema self-heal for database files created before the
//!   credential column existed
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `BIND_ADDR` - listen address (default: "0.0.0.0:5000")
//! - `DATABASE_URL` - SQLite connection string (default: "sqlite:data.db?mode=rwc")
//! - `JWT_SECRET` - token signing secret (development default, warned loudly)
//! - `TOKEN_EXPIRATION` - token lifetime in seconds (default: 43200, 12 hours)

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use auth::{AuthService, AuthUser};
pub use config::{AppConfig, AuthConfig};
pub use error::ApiError;
pub use models::*;
pub use store::{StoreError, UserStore};

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: UserStore,
    pub auth: Arc<AuthService>,
}

/// Assemble the full application router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public = Router::new()
        .route("/auth/signup", post(auth::handlers::signup))
        .route("/auth/login", post(auth::handlers::login))
        .route("/api/users", get(handlers::users::list_users))
        .route("/api/users/:id", get(handlers::users::get_user));

    // Protected routes (require a valid bearer token)
    let protected = Router::new()
        .route("/auth/me", get(auth::handlers::me))
        .route("/api/users", post(handlers::users::create_user))
        .route(
            "/api/users/:id",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
