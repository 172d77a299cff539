//! LearnHub - Digital learning platform API
//!
//! A small axum service: course/material CRUD gated by a session
//! authentication subsystem (JWT access tokens plus rotating, revocable
//! refresh tokens).
//!
//! # Modules
//!
//! - [`auth`] - credential store, token issuer, refresh token store and
//!   the login/refresh/logout orchestrator
//! - [`courses`] - course, outline and material CRUD
//! - [`gateway`] - router assembly, shared state, OpenAPI docs
//! - [`config`] - yaml configuration
//! - [`logging`] - tracing setup

pub mod auth;
pub mod config;
pub mod courses;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use auth::{
    AuthError, AuthErrorCode, AuthResult, AuthService, AuthenticatedUser, Claims, Identity,
    InMemoryRefreshTokenStore, InMemoryUserStore, RefreshRecord, RefreshTokenStore, SessionTokens,
    TokenIssuer, UserStore,
};
pub use config::{AppConfig, JwtConfig};
pub use courses::{CourseDto, CourseError, CourseStore};
