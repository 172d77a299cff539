//! Authentication orchestrator: login, refresh, logout.
//!
//! Composes the credential store, the token issuer and the refresh token
//! store. All credential and token failures surface as one generic
//! unauthenticated error; only an empty refresh token is a bad request.

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use utoipa::ToSchema;

use super::error::{AuthError, AuthErrorCode, AuthResult};
use super::models::{AuthenticatedUser, Claims, RefreshRecord};
use super::refresh_store::RefreshTokenStore;
use super::token::TokenIssuer;
use super::user_store::UserStore;
use crate::config::JwtConfig;

/// The access/refresh pair returned by login and refresh.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    /// Signed JWT bearer credential
    pub access_token: String,
    /// Access token lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
    /// Opaque single-use refresh token
    pub refresh_token: String,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    issuer: TokenIssuer,
    refresh_lifetime: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        jwt: &JwtConfig,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            issuer: TokenIssuer::new(jwt),
            refresh_lifetime: Duration::days(jwt.refresh_token_days),
        }
    }

    /// Verify credentials and mint a fresh access/refresh pair.
    ///
    /// Unknown user and wrong password produce the identical error.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<SessionTokens> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login rejected for unknown username");
                return Err(AuthError::unauthenticated());
            }
        };

        if !self.users.verify_password(&user, password).await? {
            tracing::warn!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(AuthError::unauthenticated());
        }

        let (access_token, expires_in) = self.issuer.issue(&user)?;
        let refresh = self
            .refresh_tokens
            .create(&user.id, self.refresh_lifetime)
            .await?;

        tracing::info!(user_id = %user.id, "Login succeeded");
        Ok(SessionTokens {
            access_token,
            expires_in,
            refresh_token: refresh.token,
        })
    }

    /// Exchange a refresh token for a new pair, rotating it out.
    ///
    /// The old token is good for exactly one successful exchange: a replay
    /// after rotation, an expired or revoked record, a vanished owner, or
    /// a lost rotation race all come back unauthenticated.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<SessionTokens> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::from_code(AuthErrorCode::MissingRefreshToken));
        }

        let record = match self.refresh_tokens.find(refresh_token).await? {
            Some(record) => record,
            None => return Err(AuthError::unauthenticated()),
        };
        if record.revoked {
            tracing::warn!(user_id = %record.user_id, "Refresh rejected: token already rotated or revoked");
            return Err(AuthError::unauthenticated());
        }
        if record.is_expired() {
            return Err(AuthError::unauthenticated());
        }

        // Re-resolve the owner by the stored id: a deleted or deactivated
        // account must not keep minting access tokens.
        let user = match self.users.find_by_id(&record.user_id).await? {
            Some(user) if user.id == record.user_id => user,
            _ => return Err(AuthError::unauthenticated()),
        };

        let (access_token, expires_in) = self.issuer.issue(&user)?;
        let new_record = RefreshRecord::issue(&user.id, self.refresh_lifetime);
        let new_token = new_record.token.clone();

        if !self
            .refresh_tokens
            .rotate(refresh_token, new_record)
            .await?
        {
            // Lost the rotation race; the new record was discarded.
            tracing::warn!(user_id = %user.id, "Refresh rejected: concurrent rotation won");
            return Err(AuthError::unauthenticated());
        }

        tracing::info!(user_id = %user.id, "Refresh token rotated");
        Ok(SessionTokens {
            access_token,
            expires_in,
            refresh_token: new_token,
        })
    }

    /// Revoke one refresh token, or all of the caller's when none given.
    ///
    /// Idempotent and total: unknown tokens are silent no-ops.
    pub async fn logout(
        &self,
        principal: &AuthenticatedUser,
        refresh_token: Option<&str>,
    ) -> AuthResult<()> {
        match refresh_token {
            Some(token) if !token.trim().is_empty() => {
                self.refresh_tokens.revoke(token).await?;
                tracing::info!(user_id = %principal.user_id, "Logout: one refresh token revoked");
            }
            _ => {
                let revoked = self
                    .refresh_tokens
                    .revoke_all_for_user(&principal.user_id)
                    .await?;
                tracing::info!(user_id = %principal.user_id, revoked, "Logout everywhere");
            }
        }
        Ok(())
    }

    /// Validate a bearer access token. Used by the HTTP middleware only.
    pub fn verify_access_token(&self, token: &str) -> AuthResult<Claims> {
        self.issuer.verify(token)
    }
}
