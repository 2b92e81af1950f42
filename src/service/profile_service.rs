use std::sync::Arc;

use serde::Serialize;
use validator::Validate;

use crate::{
    domain::{normalize_optional, Announcement, Identity, ProfileForm, User},
    error::{AppError, Result},
    repository::{AnnouncementRepository, UserRepository},
    storage::{profile_image_key, ImageUpload, ObjectStorage},
};

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub user: Option<User>,
    pub announcements: Vec<Announcement>,
    pub status_message: Option<String>,
}

pub struct ProfileService {
    user_repo: Arc<dyn UserRepository>,
    announcement_repo: Arc<dyn AnnouncementRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl ProfileService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self { user_repo, announcement_repo, storage }
    }

    fn required_display_name(value: Option<String>) -> Result<String> {
        normalize_optional(value)
            .ok_or_else(|| AppError::Validation("Display name is required.".to_string()))
    }

    /// A form field that was sent replaces the stored value (blank clears it);
    /// a field that was left out keeps it.
    fn merge(submitted: Option<String>, current: Option<String>) -> Option<String> {
        match submitted {
            Some(value) => normalize_optional(Some(value)),
            None => current,
        }
    }

    /// Trims every submitted field so padding does not count against the limits.
    /// Blank fields stay `Some("")`, which still means "sent".
    fn trimmed(form: ProfileForm) -> ProfileForm {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        ProfileForm {
            display_name: trim(form.display_name),
            contact_number: trim(form.contact_number),
            document_number: trim(form.document_number),
            apartment_number: trim(form.apartment_number),
            about_me: trim(form.about_me),
        }
    }

    async fn store_image(&self, uid: &str, image: &ImageUpload) -> Result<String> {
        let key = profile_image_key(uid, &image.extension()?);
        let url = self.storage.put(&key, image).await?;
        tracing::debug!("Profile image for {} stored at {}", uid, url);
        Ok(url)
    }

    /// Deletes `stale` unless the profile still points at it.
    async fn discard_stale(&self, stale: Option<&str>, kept: Option<&str>) {
        if let Some(url) = stale.filter(|url| Some(*url) != kept) {
            if let Err(e) = self.storage.delete(url).await {
                tracing::warn!("Failed to delete profile image {}: {}", url, e);
            }
        }
    }

    /// Writes the profile, then removes whichever image lost: the previous one
    /// on success, the freshly uploaded one on failure.
    async fn save_with_image(
        &self,
        user: User,
        previous_url: Option<String>,
        new_url: Option<String>,
        insert: bool,
    ) -> Result<User> {
        let saved = if insert {
            self.user_repo.upsert(user).await
        } else {
            self.user_repo.update(user).await
        };

        match saved {
            Ok(saved) => {
                self.discard_stale(previous_url.as_deref(), saved.profile_image_url.as_deref()).await;
                Ok(saved)
            }
            Err(e) => {
                self.discard_stale(new_url.as_deref(), previous_url.as_deref()).await;
                Err(e)
            }
        }
    }

    /// First-time profile setup right after registration. Overwrites the
    /// bare profile stored at sign-up.
    pub async fn setup_profile(
        &self,
        identity: &Identity,
        form: ProfileForm,
        image: Option<ImageUpload>,
    ) -> Result<User> {
        let form = Self::trimmed(form);
        form.validate()?;
        let display_name = Self::required_display_name(form.display_name)?;

        let existing_url = self
            .user_repo
            .find_by_id(&identity.uid)
            .await?
            .and_then(|user| user.profile_image_url);

        let new_url = match image {
            Some(image) => Some(self.store_image(&identity.uid, &image).await?),
            None => None,
        };

        let user = User {
            uid: identity.uid.clone(),
            display_name,
            email: identity.email.clone(),
            contact_number: normalize_optional(form.contact_number),
            document_number: normalize_optional(form.document_number),
            apartment_number: normalize_optional(form.apartment_number),
            about_me: normalize_optional(form.about_me),
            profile_image_url: new_url.clone().or_else(|| existing_url.clone()),
        };

        let saved = self.save_with_image(user, existing_url, new_url, true).await?;
        tracing::info!("Profile set up for {}", saved.uid);
        Ok(saved)
    }

    pub async fn edit_profile(
        &self,
        identity: &Identity,
        form: ProfileForm,
        image: Option<ImageUpload>,
    ) -> Result<User> {
        let form = Self::trimmed(form);
        form.validate()?;
        let current = self
            .user_repo
            .find_by_id(&identity.uid)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found.".to_string()))?;

        let display_name = match form.display_name {
            Some(name) => Self::required_display_name(Some(name))?,
            None => current.display_name.clone(),
        };

        let new_url = match image {
            Some(image) => Some(self.store_image(&identity.uid, &image).await?),
            None => None,
        };

        let user = User {
            uid: current.uid.clone(),
            display_name,
            email: current.email.clone(),
            contact_number: Self::merge(form.contact_number, current.contact_number),
            document_number: Self::merge(form.document_number, current.document_number),
            apartment_number: Self::merge(form.apartment_number, current.apartment_number),
            about_me: Self::merge(form.about_me, current.about_me),
            profile_image_url: new_url.clone().or_else(|| current.profile_image_url.clone()),
        };

        let saved = self
            .save_with_image(user, current.profile_image_url, new_url, false)
            .await?;
        tracing::info!("Profile updated for {}", saved.uid);
        Ok(saved)
    }

    /// The signed-in user's own profile and the announcements they posted.
    pub async fn my_profile(&self, uid: &str) -> Result<ProfileView> {
        let user = self.user_repo.find_by_id(uid).await?;
        let announcements = self.announcement_repo.list_by_author(uid).await?;

        let status_message = match user {
            Some(_) => None,
            None => {
                tracing::warn!("No local profile for {}", uid);
                Some("Profile incomplete. Please edit your profile.".to_string())
            }
        };

        Ok(ProfileView { user, announcements, status_message })
    }

    /// Public view of another user's profile.
    pub async fn preview(&self, uid: &str) -> Result<User> {
        self.user_repo
            .find_by_id(uid)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found.".to_string()))
    }
}
