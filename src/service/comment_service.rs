use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    domain::{Comment, CommentForm, Identity, NewComment},
    error::{AppError, Result},
    repository::{AnnouncementRepository, CommentRepository, UserRepository},
};

pub struct CommentService {
    user_repo: Arc<dyn UserRepository>,
    announcement_repo: Arc<dyn AnnouncementRepository>,
    comment_repo: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        comment_repo: Arc<dyn CommentRepository>,
    ) -> Self {
        Self { user_repo, announcement_repo, comment_repo }
    }

    async fn ensure_announcement(&self, announcement_id: &str) -> Result<()> {
        match self.announcement_repo.find_by_id(announcement_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Announcement not found.".to_string())),
        }
    }

    pub async fn add(&self, identity: &Identity, announcement_id: &str, form: CommentForm) -> Result<Comment> {
        let form = CommentForm { text: form.text.trim().to_string() };
        if form.text.is_empty() {
            return Err(AppError::Validation("Comment cannot be empty.".to_string()));
        }
        form.validate()?;

        let author = self.user_repo.find_by_id(&identity.uid).await?.ok_or_else(|| {
            AppError::BadRequest("Profile not found. You cannot comment.".to_string())
        })?;
        self.ensure_announcement(announcement_id).await?;

        let comment = self.comment_repo
            .insert(NewComment {
                announcement_id: announcement_id.to_string(),
                author_id: identity.uid.clone(),
                author_display_name: author.author_name().to_string(),
                author_profile_image_url: author.profile_image_url.clone(),
                text: form.text,
                timestamp: Utc::now(),
            })
            .await?;

        tracing::info!("Comment {} added to announcement {}", comment.id, announcement_id);
        Ok(comment)
    }

    pub async fn list(&self, announcement_id: &str) -> Result<Vec<Comment>> {
        self.ensure_announcement(announcement_id).await?;
        self.comment_repo.list_for_announcement(announcement_id).await
    }

    pub async fn delete(&self, identity: &Identity, comment_id: i64) -> Result<()> {
        let comment = self.comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;

        if comment.author_id != identity.uid {
            return Err(AppError::Forbidden);
        }

        self.comment_repo.delete(comment_id).await?;
        tracing::info!("Comment {} deleted", comment_id);
        Ok(())
    }
}
