//! OpenAPI / Swagger UI documentation.
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::handlers::{LoginRequest, LogoutRequest, MeResponse, RefreshRequest};
use crate::auth::service::SessionTokens;
use crate::courses::models::{CourseDto, CourseOutline, MaterialDto};
use crate::gateway::types::ErrorBody;

/// JWT bearer security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Paste the accessToken returned by /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LearnHub API",
        version = "1.0.0",
        description = "Digital learning platform: JWT session authentication with rotating refresh tokens, plus course and material management.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::health_check,
        // Auth
        crate::auth::handlers::login,
        crate::auth::handlers::refresh,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,
        // Courses
        crate::courses::handlers::search,
        crate::courses::handlers::get_course,
        crate::courses::handlers::create_course,
        crate::courses::handlers::update_course,
        crate::courses::handlers::delete_course,
        crate::courses::handlers::get_outline,
        crate::courses::handlers::put_outline,
        crate::courses::handlers::list_materials,
        crate::courses::handlers::add_material,
    ),
    components(
        schemas(
            LoginRequest,
            RefreshRequest,
            LogoutRequest,
            SessionTokens,
            MeResponse,
            CourseDto,
            CourseOutline,
            MaterialDto,
            ErrorBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, token refresh and logout"),
        (name = "Courses", description = "Course, outline and material management"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "LearnHub API");
    }

    #[test]
    fn test_auth_endpoints_registered() {
        let spec = ApiDoc::openapi();
        let paths = spec.paths;
        assert!(paths.paths.contains_key("/api/v1/auth/login"));
        assert!(paths.paths.contains_key("/api/v1/auth/refresh"));
        assert!(paths.paths.contains_key("/api/v1/auth/logout"));
        assert!(paths.paths.contains_key("/api/v1/auth/me"));
        assert!(paths.paths.contains_key("/api/v1/courses"));
    }

    #[test]
    fn test_security_scheme_registered() {
        let spec = ApiDoc::openapi();
        let components = spec.components.expect("should have components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
