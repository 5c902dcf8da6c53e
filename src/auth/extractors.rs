//! Authentication Extractors
//!
//! Axum extractor reading the verified claims placed in request extensions
//! by the authentication middleware.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::models::TokenClaims;

/// Authenticated user identity decoded from token claims
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl AuthUser {
    pub fn from_claims(claims: &TokenClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email.clone(),
            name: claims.name.clone(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // claims are only present when require_auth ran for this route
        parts
            .extensions
            .get::<TokenClaims>()
            .map(AuthUser::from_claims)
            .ok_or(ApiError::MissingAuthHeader)
    }
}
