pub mod user;
pub mod announcement;
pub mod comment;

pub use user::*;
pub use announcement::*;
pub use comment::*;

/// Trims a form value and treats blank input as absent.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
