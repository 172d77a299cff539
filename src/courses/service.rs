//! In-memory course/outline/material store with owner checks.
//!
//! Plain parameter-validated CRUD over concurrent keyed maps. Mutations
//! require the caller to own the course (be its teacher).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use uuid::Uuid;

use super::models::{
    CourseCreateRequest, CourseDto, CourseOutline, CourseUpdateRequest, MaterialCreateRequest,
    MaterialDto,
};
use crate::gateway::types::{ErrorBody, error_codes};

#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("course not found")]
    NotFound,
    #[error("caller is not the course owner")]
    NotOwner,
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl From<validator::ValidationErrors> for CourseError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Invalid(e.to_string())
    }
}

impl IntoResponse for CourseError {
    fn into_response(self) -> Response {
        let (status, code, error) = match &self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                error_codes::COURSE_NOT_FOUND,
                "COURSE_NOT_FOUND",
            ),
            Self::NotOwner => (
                StatusCode::FORBIDDEN,
                error_codes::NOT_COURSE_OWNER,
                "NOT_COURSE_OWNER",
            ),
            Self::Invalid(_) => (
                StatusCode::BAD_REQUEST,
                error_codes::INVALID_PARAMETER,
                "INVALID_PARAMETER",
            ),
        };
        let body = ErrorBody {
            code,
            error,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub struct CourseStore {
    courses: DashMap<String, CourseDto>,
    outlines: DashMap<String, CourseOutline>,
    materials: DashMap<String, Vec<MaterialDto>>,
}

impl CourseStore {
    pub fn new() -> Self {
        Self {
            courses: DashMap::new(),
            outlines: DashMap::new(),
            materials: DashMap::new(),
        }
    }

    /// Case-insensitive title search; empty query lists everything.
    pub fn search(&self, q: Option<&str>) -> Vec<CourseDto> {
        let needle = q.map(|s| s.to_lowercase()).filter(|s| !s.trim().is_empty());
        self.courses
            .iter()
            .filter(|c| match &needle {
                Some(n) => c.title.to_lowercase().contains(n),
                None => true,
            })
            .map(|c| c.clone())
            .collect()
    }

    pub fn find(&self, course_id: &str) -> Option<CourseDto> {
        self.courses.get(course_id).map(|c| c.clone())
    }

    pub fn create(&self, req: CourseCreateRequest, teacher_id: &str) -> CourseDto {
        let course = CourseDto {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            teacher_id: teacher_id.to_string(),
            progress_pct: None,
        };
        self.courses.insert(course.id.clone(), course.clone());
        course
    }

    pub fn update(
        &self,
        course_id: &str,
        req: CourseUpdateRequest,
        teacher_id: &str,
    ) -> Result<CourseDto, CourseError> {
        let mut course = self.courses.get_mut(course_id).ok_or(CourseError::NotFound)?;
        if course.teacher_id != teacher_id {
            return Err(CourseError::NotOwner);
        }
        course.title = req.title;
        course.description = req.description;
        Ok(course.clone())
    }

    pub fn delete(&self, course_id: &str, teacher_id: &str) -> Result<(), CourseError> {
        if !self.is_owner(course_id, teacher_id)? {
            return Err(CourseError::NotOwner);
        }
        self.courses.remove(course_id);
        self.outlines.remove(course_id);
        self.materials.remove(course_id);
        Ok(())
    }

    pub fn outline(&self, course_id: &str) -> Option<CourseOutline> {
        self.outlines.get(course_id).map(|o| o.clone())
    }

    pub fn set_outline(
        &self,
        course_id: &str,
        outline: CourseOutline,
        teacher_id: &str,
    ) -> Result<(), CourseError> {
        if !self.is_owner(course_id, teacher_id)? {
            return Err(CourseError::NotOwner);
        }
        self.outlines.insert(course_id.to_string(), outline);
        Ok(())
    }

    pub fn materials(&self, course_id: &str) -> Vec<MaterialDto> {
        self.materials
            .get(course_id)
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn add_material(
        &self,
        course_id: &str,
        req: MaterialCreateRequest,
        teacher_id: &str,
    ) -> Result<MaterialDto, CourseError> {
        if !self.is_owner(course_id, teacher_id)? {
            return Err(CourseError::NotOwner);
        }
        let material = MaterialDto {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            kind: req.kind,
            title: req.title,
            content: req.content,
            video_url: req.video_url,
            duration_seconds: req.duration_seconds,
        };
        self.materials
            .entry(course_id.to_string())
            .or_default()
            .push(material.clone());
        Ok(material)
    }

    /// Err(NotFound) when the course does not exist at all.
    fn is_owner(&self, course_id: &str, teacher_id: &str) -> Result<bool, CourseError> {
        let course = self.courses.get(course_id).ok_or(CourseError::NotFound)?;
        Ok(course.teacher_id == teacher_id)
    }
}

impl Default for CourseStore {
    fn default() -> Self {
        Self::new()
    }
}
