//! Course, outline and material CRUD.

pub mod handlers;
pub mod models;
pub mod service;

pub use models::{CourseDto, CourseOutline, MaterialDto, MaterialKind};
pub use service::{CourseError, CourseStore};
