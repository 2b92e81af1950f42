#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;
use tablon::{
    config::Settings,
    domain::{Announcement, User},
};

/// A single-connection in-memory pool so every query sees the same database.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    tablon::connect_database("sqlite::memory:", 1).await
}

/// Default settings with storage pointed at a fresh temp directory.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.storage.root = temp_storage_root().to_string_lossy().into_owned();
    settings
}

pub fn temp_storage_root() -> PathBuf {
    std::env::temp_dir().join(format!("tablon-test-{}", uuid::Uuid::new_v4()))
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
}

pub fn user(uid: &str, name: &str) -> User {
    let mut user = User::basic(uid, format!("{}@example.com", uid));
    user.display_name = name.to_string();
    user
}

pub fn announcement(id: &str, author: &User, title: &str, timestamp: DateTime<Utc>) -> Announcement {
    Announcement {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("About {}", title.to_lowercase()),
        author_id: author.uid.clone(),
        author_email: author.email.clone(),
        author_display_name: author.display_name.clone(),
        author_profile_image_url: author.profile_image_url.clone(),
        image_url: None,
        timestamp,
    }
}
