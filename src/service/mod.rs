pub mod account_service;
pub mod profile_service;
pub mod announcement_service;
pub mod comment_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::auth::{AuthService, LocalIdentityProvider};
use crate::config::Settings;
use crate::repository::*;
use crate::storage::{LocalObjectStorage, ObjectStorage};
use account_service::AccountService;
use profile_service::ProfileService;
use announcement_service::AnnouncementService;
use comment_service::CommentService;

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub comment_repo: Arc<dyn CommentRepository>,
    pub storage: Arc<dyn ObjectStorage>,
    pub auth_service: Arc<AuthService>,
    pub account_service: Arc<AccountService>,
    pub profile_service: Arc<ProfileService>,
    pub announcement_service: Arc<AnnouncementService>,
    pub comment_service: Arc<CommentService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        db_pool: SqlitePool,
        storage: Arc<dyn ObjectStorage>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        let user_repo: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(db_pool.clone()));
        let announcement_repo: Arc<dyn AnnouncementRepository> =
            Arc::new(SqliteAnnouncementRepository::new(db_pool.clone()));
        let comment_repo: Arc<dyn CommentRepository> =
            Arc::new(SqliteCommentRepository::new(db_pool.clone()));

        let account_service = Arc::new(AccountService::new(
            auth_service.clone(),
            user_repo.clone(),
        ));
        let profile_service = Arc::new(ProfileService::new(
            user_repo.clone(),
            announcement_repo.clone(),
            storage.clone(),
        ));
        let announcement_service = Arc::new(AnnouncementService::new(
            user_repo.clone(),
            announcement_repo.clone(),
            comment_repo.clone(),
            storage.clone(),
        ));
        let comment_service = Arc::new(CommentService::new(
            user_repo.clone(),
            announcement_repo.clone(),
            comment_repo.clone(),
        ));

        Self {
            user_repo,
            announcement_repo,
            comment_repo,
            storage,
            auth_service,
            account_service,
            profile_service,
            announcement_service,
            comment_service,
            db_pool,
        }
    }

    /// Wires the local identity provider and filesystem storage from settings.
    pub fn from_settings(db_pool: SqlitePool, settings: &Settings) -> Self {
        let identity = Arc::new(LocalIdentityProvider::new(
            db_pool.clone(),
            settings.auth.min_password_length,
        ));
        let auth_service = Arc::new(AuthService::new(
            db_pool.clone(),
            identity,
            settings.auth.session_duration_hours,
        ));
        let storage = Arc::new(LocalObjectStorage::new(
            &settings.storage.root,
            settings.storage.public_path.clone(),
            settings.storage.max_upload_bytes,
        ));

        Self::new(db_pool, storage, auth_service)
    }
}
