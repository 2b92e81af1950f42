use async_trait::async_trait;
use crate::domain::*;
use crate::error::Result;

pub mod user_repository;
pub mod announcement_repository;
pub mod comment_repository;

pub use user_repository::SqliteUserRepository;
pub use announcement_repository::SqliteAnnouncementRepository;
pub use comment_repository::SqliteCommentRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the profile or updates it in place when the uid already exists.
    async fn upsert(&self, user: User) -> Result<User>;
    async fn update(&self, user: User) -> Result<User>;
    async fn find_by_id(&self, uid: &str) -> Result<Option<User>>;
    async fn delete(&self, uid: &str) -> Result<()>;
    async fn delete_all(&self) -> Result<u64>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn insert(&self, announcement: Announcement) -> Result<Announcement>;
    async fn insert_all(&self, announcements: Vec<Announcement>) -> Result<()>;
    async fn update(&self, announcement: Announcement) -> Result<Announcement>;
    /// Updates the announcement only if nobody has commented on it.
    /// Returns `None` when the row is missing or has comments.
    async fn update_without_comments(&self, announcement: Announcement) -> Result<Option<Announcement>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Announcement>>;
    async fn list_all(&self) -> Result<Vec<Announcement>>;
    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Announcement>>;
    async fn delete(&self, id: &str) -> Result<()>;
    /// Deletes the announcement only if nobody has commented on it.
    /// Returns whether a row was removed.
    async fn delete_without_comments(&self, id: &str) -> Result<bool>;
    async fn delete_all(&self) -> Result<u64>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: NewComment) -> Result<Comment>;
    async fn insert_all(&self, comments: Vec<Comment>) -> Result<()>;
    async fn update(&self, comment: Comment) -> Result<Comment>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>>;
    async fn list_for_announcement(&self, announcement_id: &str) -> Result<Vec<Comment>>;
    async fn count_for_announcement(&self, announcement_id: &str) -> Result<i64>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn delete_for_announcement(&self, announcement_id: &str) -> Result<u64>;
    async fn delete_all(&self) -> Result<u64>;
}
