//! Shared gateway response types and error code constants.

use serde::Serialize;
use utoipa::ToSchema;

/// JSON body for every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code
    #[schema(example = 2002)]
    pub code: i32,
    /// Stable error name
    #[schema(example = "AUTH_FAILED")]
    pub error: &'static str,
    /// Human-readable description
    pub message: String,
}

/// Error codes outside the auth subsystem (auth owns 2xxx/5000).
pub mod error_codes {
    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;

    // Resource errors (4xxx)
    pub const COURSE_NOT_FOUND: i32 = 4001;
    pub const NOT_COURSE_OWNER: i32 = 4003;
}
