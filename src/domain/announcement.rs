use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author_id: String,
    pub author_email: String,
    pub author_display_name: String,
    pub author_profile_image_url: Option<String>,
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Announcement {
    /// Case-insensitive match against the fields the feed search covers.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [
            &self.title,
            &self.description,
            &self.author_email,
            &self.author_display_name,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AnnouncementForm {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub title: String,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: String,
}
