//! Bearer token verification middleware.
//!
//! Validates the `Authorization: Bearer <jwt>` header and injects an
//! explicit [`AuthenticatedUser`] into request extensions. Handlers never
//! read claims from ambient context.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::error::{AuthError, AuthErrorCode};
use super::models::AuthenticatedUser;
use crate::gateway::state::AppState;

pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AuthError::from_code(AuthErrorCode::MissingAuth))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::from_code(AuthErrorCode::MissingAuth))?;

    let claims = state.auth.verify_access_token(token)?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser::from_claims(&claims));
    Ok(next.run(request).await)
}
