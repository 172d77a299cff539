//! Course, outline and material DTOs with request validation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: String,
    #[schema(example = "Rust 101")]
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: String,
    /// Completion percentage, when progress tracking applies
    pub progress_pct: Option<f64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CourseCreateRequest {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Rust 101")]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

pub type CourseUpdateRequest = CourseCreateRequest;

/// Ordered outline of modules and their items.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CourseOutline {
    #[validate(nested)]
    pub modules: Vec<OutlineModule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OutlineModule {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    /// 1-based position within the outline
    #[validate(range(min = 1))]
    pub order: u32,
    #[validate(nested)]
    pub items: Vec<OutlineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutlineItem {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[serde(rename = "type")]
    pub kind: OutlineItemKind,
    /// Linked material/quiz/assignment id; None while unlinked
    pub ref_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutlineItemKind {
    Material,
    Quiz,
    Assignment,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDto {
    pub id: String,
    pub course_id: String,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    pub title: String,
    /// Body text, for `text` materials
    pub content: Option<String>,
    /// Stream/download link, for `video` materials
    pub video_url: Option<String>,
    pub duration_seconds: Option<u32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialCreateRequest {
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub content: Option<String>,
    #[validate(url)]
    pub video_url: Option<String>,
    pub duration_seconds: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Text,
    Video,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds_enforced() {
        let empty = CourseCreateRequest {
            title: String::new(),
            description: None,
        };
        assert!(empty.validate().is_err());

        let too_long = CourseCreateRequest {
            title: "x".repeat(101),
            description: None,
        };
        assert!(too_long.validate().is_err());

        let ok = CourseCreateRequest {
            title: "Rust 101".to_string(),
            description: Some("Intro course".to_string()),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_outline_order_must_be_positive() {
        let outline = CourseOutline {
            modules: vec![OutlineModule {
                title: "Week 1".to_string(),
                order: 0,
                items: vec![],
            }],
        };
        assert!(outline.validate().is_err());
    }

    #[test]
    fn test_material_kind_wire_format() {
        let req: MaterialCreateRequest = serde_json::from_str(
            r#"{"type":"video","title":"Intro","videoUrl":"https://example.com/v.mp4","durationSeconds":90}"#,
        )
        .unwrap();
        assert_eq!(req.kind, MaterialKind::Video);
        assert!(req.validate().is_ok());
    }
}
