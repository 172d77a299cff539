//! Session authentication subsystem.
//!
//! Credential verification, signed access token issuance and the
//! refresh-token lifecycle (create, single-use rotation, revocation).
//!
//! - [`user_store`] - identity lookup + argon2 password verification
//! - [`token`] - stateless HS256 JWT issuance/verification
//! - [`refresh_store`] - opaque token registry with atomic rotation
//! - [`service`] - the login/refresh/logout orchestrator
//! - [`middleware`] - bearer verification for protected routes

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod refresh_store;
pub mod service;
pub mod token;
pub mod user_store;

pub use error::{AuthError, AuthErrorCode, AuthResult};
pub use models::{AuthenticatedUser, Claims, Identity, RefreshRecord};
pub use refresh_store::{InMemoryRefreshTokenStore, RefreshTokenStore};
pub use service::{AuthService, SessionTokens};
pub use token::TokenIssuer;
pub use user_store::{InMemoryUserStore, UserStore};
