use std::sync::Arc;

use crate::auth::service::AuthService;
use crate::courses::service::CourseStore;

/// Shared gateway state.
#[derive(Clone)]
pub struct AppState {
    /// Login / refresh / logout orchestrator
    pub auth: Arc<AuthService>,
    /// Course/outline/material store
    pub courses: Arc<CourseStore>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, courses: Arc<CourseStore>) -> Self {
        Self { auth, courses }
    }
}
