//! HTTP gateway: router assembly and server startup.

pub mod openapi;
pub mod state;
pub mod types;

use anyhow::Context;
use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::handlers as auth_handlers;
use crate::auth::middleware::jwt_auth_middleware;
use crate::auth::refresh_store::InMemoryRefreshTokenStore;
use crate::auth::service::AuthService;
use crate::auth::user_store::InMemoryUserStore;
use crate::config::AppConfig;
use crate::courses::{handlers as course_handlers, service::CourseStore};
use state::AppState;

/// Health check response data
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
}

/// Health check endpoint
///
/// GET /api/v1/health
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Service healthy", body = HealthResponse)),
    tag = "System"
)]
pub async fn health_check() -> Json<HealthResponse> {
    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    Json(HealthResponse { timestamp_ms })
}

/// Build the full application router against a prepared state.
///
/// Split out of `run_server` so integration tests can drive the router
/// without binding a socket.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Login and refresh are anonymous by design; logout and me require a
    // verified bearer token.
    let auth_public = Router::new()
        .route("/login", post(auth_handlers::login))
        .route("/refresh", post(auth_handlers::refresh));
    let auth_protected = Router::new()
        .route("/logout", post(auth_handlers::logout))
        .route("/me", get(auth_handlers::me))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let courses_public = Router::new()
        .route("/", get(course_handlers::search))
        .route("/{course_id}", get(course_handlers::get_course))
        .route("/{course_id}/outline", get(course_handlers::get_outline))
        .route(
            "/{course_id}/materials",
            get(course_handlers::list_materials),
        );
    let courses_protected = Router::new()
        .route("/", post(course_handlers::create_course))
        .route(
            "/{course_id}",
            put(course_handlers::update_course).delete(course_handlers::delete_course),
        )
        .route("/{course_id}/outline", put(course_handlers::put_outline))
        .route(
            "/{course_id}/materials",
            post(course_handlers::add_material),
        )
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/api/v1/health", get(health_check))
        .nest("/api/v1/auth", auth_public.merge(auth_protected))
        .nest("/api/v1/courses", courses_public.merge(courses_protected))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Wire up stores and services from config.
pub fn build_state(config: &AppConfig) -> anyhow::Result<Arc<AppState>> {
    let users = Arc::new(
        InMemoryUserStore::with_demo_users().context("Failed to provision seed users")?,
    );
    let refresh_tokens = Arc::new(InMemoryRefreshTokenStore::new());
    let auth = Arc::new(AuthService::new(users, refresh_tokens, &config.jwt));
    let courses = Arc::new(CourseStore::new());
    Ok(Arc::new(AppState::new(auth, courses)))
}

/// Start the HTTP gateway server.
pub async fn run_server(config: &AppConfig, port_override: Option<u16>) -> anyhow::Result<()> {
    let state = build_state(config)?;
    let app = build_router(state);

    let port = port_override.unwrap_or(config.gateway.port);
    let addr = format!("{}:{}", config.gateway.host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API docs at http://{}/docs", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;
    Ok(())
}
