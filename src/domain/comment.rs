use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub announcement_id: String,
    pub author_id: String,
    pub author_display_name: String,
    pub author_profile_image_url: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A comment before the store has assigned its id.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub announcement_id: String,
    pub author_id: String,
    pub author_display_name: String,
    pub author_profile_image_url: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub text: String,
}
