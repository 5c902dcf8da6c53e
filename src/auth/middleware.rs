//! Authentication Middleware
//!
//! Bearer-token validation for protected routes. The decoded claims are
//! stored in request extensions for the `AuthUser` extractor.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::AppState;

/// Extract the token from a strict two-part `Bearer <token>` header
fn parse_bearer(header: &str) -> Option<&str> {
    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() == 2 && parts[0] == "Bearer" {
        Some(parts[1])
    } else {
        None
    }
}

/// Require an authenticated request.
///
/// Rejects with 401 for a missing header, a malformed scheme, or a token that
/// fails signature or expiry checks; otherwise attaches the verified claims
/// and calls through.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::MissingAuthHeader)?;

    let token = parse_bearer(header).ok_or(ApiError::MalformedAuthHeader)?;

    let claims = state.auth.validate_token(token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
