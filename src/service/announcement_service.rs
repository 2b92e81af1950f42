use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{Announcement, AnnouncementForm, Comment, Identity, User},
    error::{AppError, Result},
    repository::{AnnouncementRepository, CommentRepository, UserRepository},
    storage::{announcement_image_key, ImageUpload, ObjectStorage},
};

/// State of the main board: greeting, the (possibly filtered) feed and an
/// optional message for empty results.
#[derive(Debug, Clone, Serialize)]
pub struct FeedView {
    pub welcome_message: String,
    pub announcements: Vec<Announcement>,
    pub total: usize,
    pub search_query: String,
    pub status_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementDetail {
    pub announcement: Announcement,
    pub comments: Vec<Comment>,
    pub is_author: bool,
    pub can_edit_delete: bool,
}

pub fn filter_announcements(announcements: &[Announcement], query: &str) -> Vec<Announcement> {
    if query.is_empty() {
        return announcements.to_vec();
    }
    announcements
        .iter()
        .filter(|a| a.matches(query))
        .cloned()
        .collect()
}

pub fn feed_status(total: usize, matched: usize, query: &str) -> Option<String> {
    if query.is_empty() {
        (total == 0).then(|| "No announcements have been posted yet.".to_string())
    } else {
        (matched == 0).then(|| format!("No results found for '{}'.", query))
    }
}

pub fn welcome_message(profile: Option<&User>, identity: &Identity) -> String {
    let name = profile
        .map(|p| p.display_name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(identity.email.as_str());
    format!("Welcome, {}!", name)
}

pub struct AnnouncementService {
    user_repo: Arc<dyn UserRepository>,
    announcement_repo: Arc<dyn AnnouncementRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl AnnouncementService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self { user_repo, announcement_repo, comment_repo, storage }
    }

    fn validated(form: AnnouncementForm) -> Result<AnnouncementForm> {
        let form = AnnouncementForm {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
        };
        if form.title.is_empty() || form.description.is_empty() {
            return Err(AppError::Validation(
                "Please fill in title and description.".to_string(),
            ));
        }
        form.validate()?;
        Ok(form)
    }

    async fn author_profile(&self, uid: &str) -> Result<User> {
        self.user_repo.find_by_id(uid).await?.ok_or_else(|| {
            tracing::warn!("Announcement save attempted without a local profile for {}", uid);
            AppError::BadRequest("Profile not found. You cannot post.".to_string())
        })
    }

    async fn find(&self, id: &str) -> Result<Announcement> {
        self.announcement_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found.".to_string()))
    }

    /// Author-only operations are refused once anyone has commented.
    /// `action` is the past participle used in the refusal message.
    async fn ensure_editable(&self, announcement: &Announcement, identity: &Identity, action: &str) -> Result<()> {
        if announcement.author_id != identity.uid {
            return Err(AppError::Forbidden);
        }
        let comments = self.comment_repo.count_for_announcement(&announcement.id).await?;
        if comments > 0 {
            tracing::warn!(
                "Announcement {} has {} comments and cannot be {}",
                announcement.id,
                comments,
                action
            );
            return Err(AppError::Conflict(format!(
                "This announcement has comments and cannot be {}.",
                action
            )));
        }
        Ok(())
    }

    async fn store_image(&self, announcement_id: &str, image: &ImageUpload) -> Result<String> {
        let key = announcement_image_key(announcement_id, &image.extension()?);
        self.storage.put(&key, image).await
    }

    async fn discard_image(&self, url: &str) {
        if let Err(e) = self.storage.delete(url).await {
            tracing::warn!("Failed to delete announcement image {}: {}", url, e);
        }
    }

    /// Deletes `stale` unless the row still points at it.
    async fn discard_stale(&self, stale: Option<&str>, kept: Option<&str>) {
        if let Some(url) = stale.filter(|url| Some(*url) != kept) {
            self.discard_image(url).await;
        }
    }

    pub async fn feed(&self, identity: &Identity, query: Option<&str>) -> Result<FeedView> {
        let profile = self.user_repo.find_by_id(&identity.uid).await?;
        let all = self.announcement_repo.list_all().await?;

        let query = query.map(str::trim).unwrap_or_default();
        let announcements = filter_announcements(&all, query);
        tracing::debug!("Feed: {} of {} announcements match '{}'", announcements.len(), all.len(), query);

        Ok(FeedView {
            welcome_message: welcome_message(profile.as_ref(), identity),
            status_message: feed_status(all.len(), announcements.len(), query),
            total: announcements.len(),
            announcements,
            search_query: query.to_string(),
        })
    }

    pub async fn create(
        &self,
        identity: &Identity,
        form: AnnouncementForm,
        image: Option<ImageUpload>,
    ) -> Result<Announcement> {
        let form = Self::validated(form)?;
        let author = self.author_profile(&identity.uid).await?;

        let id = Uuid::new_v4().to_string();
        let image_url = match image {
            Some(image) => Some(self.store_image(&id, &image).await?),
            None => None,
        };

        let announcement = Announcement {
            id,
            title: form.title,
            description: form.description,
            author_id: identity.uid.clone(),
            author_email: identity.email.clone(),
            author_display_name: author.author_name().to_string(),
            author_profile_image_url: author.profile_image_url.clone(),
            image_url,
            timestamp: Utc::now(),
        };

        match self.announcement_repo.insert(announcement.clone()).await {
            Ok(created) => {
                tracing::info!("Announcement {} published by {}", created.id, identity.uid);
                Ok(created)
            }
            Err(e) => {
                if let Some(url) = &announcement.image_url {
                    self.discard_image(url).await;
                }
                Err(e)
            }
        }
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: &str,
        form: AnnouncementForm,
        image: Option<ImageUpload>,
    ) -> Result<Announcement> {
        let existing = self.find(id).await?;
        self.ensure_editable(&existing, identity, "edited").await?;
        let form = Self::validated(form)?;
        let author = self.author_profile(&identity.uid).await?;

        let new_image_url = match image {
            Some(image) => Some(self.store_image(&existing.id, &image).await?),
            None => None,
        };

        let announcement = Announcement {
            id: existing.id.clone(),
            title: form.title,
            description: form.description,
            author_id: identity.uid.clone(),
            author_email: identity.email.clone(),
            author_display_name: author.author_name().to_string(),
            author_profile_image_url: author.profile_image_url.clone(),
            image_url: new_image_url.clone().or_else(|| existing.image_url.clone()),
            timestamp: existing.timestamp,
        };

        // Guarded again in SQL in case a comment arrived since the check
        let outcome = match self.announcement_repo.update_without_comments(announcement).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => match self.announcement_repo.find_by_id(id).await {
                Ok(Some(_)) => Err(AppError::Conflict(
                    "This announcement has comments and cannot be edited.".to_string(),
                )),
                Ok(None) => Err(AppError::NotFound("Announcement not found.".to_string())),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match outcome {
            Ok(updated) => {
                self.discard_stale(existing.image_url.as_deref(), updated.image_url.as_deref()).await;
                tracing::info!("Announcement {} updated", updated.id);
                Ok(updated)
            }
            Err(e) => {
                self.discard_stale(new_image_url.as_deref(), existing.image_url.as_deref()).await;
                Err(e)
            }
        }
    }

    pub async fn delete(&self, identity: &Identity, id: &str) -> Result<()> {
        let announcement = self.find(id).await?;
        self.ensure_editable(&announcement, identity, "deleted").await?;

        // Guarded again in SQL in case a comment arrived since the check
        if !self.announcement_repo.delete_without_comments(id).await? {
            return Err(AppError::Conflict(
                "This announcement has comments and cannot be deleted.".to_string(),
            ));
        }
        tracing::info!("Announcement {} deleted", id);

        if let Some(url) = &announcement.image_url {
            self.discard_image(url).await;
        }

        Ok(())
    }

    pub async fn detail(&self, identity: &Identity, id: &str) -> Result<AnnouncementDetail> {
        let announcement = self.find(id).await?;
        let comments = self.comment_repo.list_for_announcement(id).await?;

        let is_author = announcement.author_id == identity.uid;
        let can_edit_delete = is_author && comments.is_empty();

        Ok(AnnouncementDetail {
            announcement,
            comments,
            is_author,
            can_edit_delete,
        })
    }
}
