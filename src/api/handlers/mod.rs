pub mod root;
pub mod auth;
pub mod announcements;
pub mod comments;
pub mod profile;
