//! HTTP handlers for /api/v1/courses.
//!
//! Read endpoints are public; mutations require a bearer token with the
//! `Teacher` role and, past creation, course ownership.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use validator::Validate;

use super::models::{
    CourseCreateRequest, CourseDto, CourseOutline, CourseUpdateRequest, MaterialCreateRequest,
    MaterialDto,
};
use super::service::CourseError;
use crate::auth::error::{AuthError, AuthErrorCode};
use crate::auth::models::AuthenticatedUser;
use crate::gateway::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive title filter
    pub q: Option<String>,
}

fn require_teacher(principal: &AuthenticatedUser) -> Result<(), AuthError> {
    if principal.has_role("Teacher") {
        Ok(())
    } else {
        Err(AuthError::from_code(AuthErrorCode::PermissionDenied))
    }
}

/// Search courses by title
///
/// GET /api/v1/courses
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(SearchQuery),
    responses((status = 200, description = "Matching courses", body = [CourseDto])),
    tag = "Courses"
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<CourseDto>> {
    Json(state.courses.search(query.q.as_deref()))
}

/// Get one course
///
/// GET /api/v1/courses/{course_id}
#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = CourseDto),
        (status = 404, description = "No such course")
    ),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseDto>, CourseError> {
    state
        .courses
        .find(&course_id)
        .map(Json)
        .ok_or(CourseError::NotFound)
}

/// Create a course (Teacher role)
///
/// POST /api/v1/courses
#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CourseCreateRequest,
    responses(
        (status = 201, description = "Created", body = CourseDto),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Caller is not a teacher")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthenticatedUser>,
    Json(req): Json<CourseCreateRequest>,
) -> Result<(StatusCode, Json<CourseDto>), Response> {
    require_teacher(&principal).map_err(IntoResponse::into_response)?;
    req.validate()
        .map_err(|e| CourseError::from(e).into_response())?;

    let created = state.courses.create(req, &principal.user_id);
    tracing::info!(course_id = %created.id, teacher_id = %principal.user_id, "Course created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a course (owner only)
///
/// PUT /api/v1/courses/{course_id}
#[utoipa::path(
    put,
    path = "/api/v1/courses/{course_id}",
    params(("course_id" = String, Path, description = "Course id")),
    request_body = CourseCreateRequest,
    responses(
        (status = 200, description = "Updated", body = CourseDto),
        (status = 403, description = "Not the course owner"),
        (status = 404, description = "No such course")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthenticatedUser>,
    Path(course_id): Path<String>,
    Json(req): Json<CourseUpdateRequest>,
) -> Result<Json<CourseDto>, Response> {
    require_teacher(&principal).map_err(IntoResponse::into_response)?;
    req.validate()
        .map_err(|e| CourseError::from(e).into_response())?;

    let updated = state
        .courses
        .update(&course_id, req, &principal.user_id)
        .map_err(IntoResponse::into_response)?;
    Ok(Json(updated))
}

/// Delete a course (owner only)
///
/// DELETE /api/v1/courses/{course_id}
#[utoipa::path(
    delete,
    path = "/api/v1/courses/{course_id}",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the course owner"),
        (status = 404, description = "No such course")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthenticatedUser>,
    Path(course_id): Path<String>,
) -> Result<StatusCode, Response> {
    require_teacher(&principal).map_err(IntoResponse::into_response)?;
    state
        .courses
        .delete(&course_id, &principal.user_id)
        .map_err(IntoResponse::into_response)?;
    tracing::info!(course_id = %course_id, "Course deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Get the course outline
///
/// GET /api/v1/courses/{course_id}/outline
#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}/outline",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Outline", body = CourseOutline),
        (status = 404, description = "No course or no outline yet")
    ),
    tag = "Courses"
)]
pub async fn get_outline(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseOutline>, CourseError> {
    state
        .courses
        .outline(&course_id)
        .map(Json)
        .ok_or(CourseError::NotFound)
}

/// Replace the course outline (owner only)
///
/// PUT /api/v1/courses/{course_id}/outline
#[utoipa::path(
    put,
    path = "/api/v1/courses/{course_id}/outline",
    params(("course_id" = String, Path, description = "Course id")),
    request_body = CourseOutline,
    responses(
        (status = 200, description = "Outline stored"),
        (status = 403, description = "Not the course owner"),
        (status = 404, description = "No such course")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn put_outline(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthenticatedUser>,
    Path(course_id): Path<String>,
    Json(outline): Json<CourseOutline>,
) -> Result<StatusCode, Response> {
    require_teacher(&principal).map_err(IntoResponse::into_response)?;
    outline
        .validate()
        .map_err(|e| CourseError::from(e).into_response())?;

    state
        .courses
        .set_outline(&course_id, outline, &principal.user_id)
        .map_err(IntoResponse::into_response)?;
    Ok(StatusCode::OK)
}

/// List course materials
///
/// GET /api/v1/courses/{course_id}/materials
#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}/materials",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Materials", body = [MaterialDto]),
        (status = 404, description = "No such course")
    ),
    tag = "Courses"
)]
pub async fn list_materials(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<MaterialDto>>, CourseError> {
    if state.courses.find(&course_id).is_none() {
        return Err(CourseError::NotFound);
    }
    Ok(Json(state.courses.materials(&course_id)))
}

/// Add a material (owner only)
///
/// The course id comes from the route, never the body, so a payload
/// cannot attach material to someone else's course.
///
/// POST /api/v1/courses/{course_id}/materials
#[utoipa::path(
    post,
    path = "/api/v1/courses/{course_id}/materials",
    params(("course_id" = String, Path, description = "Course id")),
    request_body = MaterialCreateRequest,
    responses(
        (status = 201, description = "Created", body = MaterialDto),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Not the course owner"),
        (status = 404, description = "No such course")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn add_material(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthenticatedUser>,
    Path(course_id): Path<String>,
    Json(req): Json<MaterialCreateRequest>,
) -> Result<(StatusCode, Json<MaterialDto>), Response> {
    require_teacher(&principal).map_err(IntoResponse::into_response)?;
    req.validate()
        .map_err(|e| CourseError::from(e).into_response())?;

    let created = state
        .courses
        .add_material(&course_id, req, &principal.user_id)
        .map_err(IntoResponse::into_response)?;
    Ok((StatusCode::CREATED, Json(created)))
}
