//! HTTP handlers for /api/v1/auth.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::error::AuthError;
use super::models::AuthenticatedUser;
use super::service::SessionTokens;
use crate::gateway::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "teacher1")]
    pub username: String,
    #[schema(example = "P@ssw0rd!")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    /// Specific refresh token to revoke; omit to revoke all sessions.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[schema(example = "T001")]
    pub user_id: String,
    #[schema(example = "teacher1")]
    pub username: String,
    #[schema(example = json!(["Teacher"]))]
    pub roles: Vec<String>,
}

/// Login with username and password
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access and refresh tokens issued", body = SessionTokens),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionTokens>, AuthError> {
    let tokens = state.auth.login(&req.username, &req.password).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new token pair
///
/// The submitted refresh token is rotated: it is revoked and a new one is
/// returned. Each refresh token works exactly once.
///
/// POST /api/v1/auth/refresh
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair issued", body = SessionTokens),
        (status = 400, description = "Refresh token missing from body"),
        (status = 401, description = "Refresh token invalid, expired or already used")
    ),
    tag = "Auth"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<SessionTokens>, AuthError> {
    let tokens = state.auth.refresh(&req.refresh_token).await?;
    Ok(Json(tokens))
}

/// Logout: revoke one refresh token or all of the caller's
///
/// POST /api/v1/auth/logout
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 204, description = "Revoked (idempotent; unknown tokens are a no-op)"),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthenticatedUser>,
    body: Option<Json<LogoutRequest>>,
) -> Result<StatusCode, AuthError> {
    let refresh_token = body.as_ref().and_then(|b| b.refresh_token.as_deref());
    state.auth.logout(&principal, refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current authenticated principal
///
/// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Verified identity and roles", body = MeResponse),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(Extension(principal): Extension<AuthenticatedUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: principal.user_id,
        username: principal.username,
        roles: principal.roles,
    })
}
