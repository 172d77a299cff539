//! Authentication error types.
//!
//! Every credential or token failure collapses into one generic
//! unauthenticated code so responses never reveal whether a username
//! exists or which check a refresh token failed.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::gateway::types::ErrorBody;

pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication error codes (2xxx client, 5xxx server).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AuthErrorCode {
    /// 2001: Authorization header missing or malformed
    MissingAuth = 2001,
    /// 2002: Credentials or token rejected (deliberately unspecific)
    AuthFailed = 2002,
    /// 2003: Refresh token absent from the request body
    MissingRefreshToken = 2003,
    /// 2004: Authenticated but lacking the required role
    PermissionDenied = 2004,
    /// 5000: Signing key or store failure
    InternalError = 5000,
}

impl AuthErrorCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MissingAuth => "MISSING_AUTH",
            Self::AuthFailed => "AUTH_FAILED",
            Self::MissingRefreshToken => "MISSING_REFRESH_TOKEN",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn http_status(self) -> StatusCode {
        match self {
            Self::MissingRefreshToken => StatusCode::BAD_REQUEST,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Authentication error with message.
#[derive(Debug, Clone)]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub message: String,
}

impl AuthError {
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_code(code: AuthErrorCode) -> Self {
        let message = match code {
            AuthErrorCode::MissingAuth => "Missing or malformed Authorization header",
            AuthErrorCode::AuthFailed => "Invalid credentials or token",
            AuthErrorCode::MissingRefreshToken => "Refresh token is required",
            AuthErrorCode::PermissionDenied => "Insufficient role for this operation",
            AuthErrorCode::InternalError => "Internal server error",
        };
        Self::new(code, message)
    }

    /// The one unauthenticated outcome every credential failure maps to.
    pub fn unauthenticated() -> Self {
        Self::from_code(AuthErrorCode::AuthFailed)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.name(), self.message)
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code.code(),
            error: self.code.name(),
            message: self.message,
        };
        (self.code.http_status(), Json(body)).into_response()
    }
}
