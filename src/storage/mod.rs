//! Object storage for profile and announcement images.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Allowed image extensions
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// An image received from a client form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// Lowercased extension of the original filename, if it is an accepted image type.
    pub fn extension(&self) -> Result<String> {
        let extension = Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .ok_or_else(|| AppError::Validation("Invalid filename".to_string()))?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::Validation(format!(
                "Invalid file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        Ok(extension)
    }
}

pub fn profile_image_key(uid: &str, extension: &str) -> String {
    format!("profile_images/{}.{}", uid, extension)
}

pub fn announcement_image_key(announcement_id: &str, extension: &str) -> String {
    format!("announcement_images/{}.{}", announcement_id, extension)
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores the image under `key` and returns the URL it is reachable at.
    async fn put(&self, key: &str, image: &ImageUpload) -> Result<String>;
    /// Removes the object behind `url`. URLs this storage did not issue are ignored.
    async fn delete(&self, url: &str) -> Result<()>;
}

/// Filesystem-backed storage whose objects are served under `public_path`.
pub struct LocalObjectStorage {
    root: PathBuf,
    public_path: String,
    max_bytes: usize,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_path: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            public_path: public_path.into().trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_path, key)
    }

    fn key_for<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.public_path.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(AppError::BadRequest(format!("Invalid storage key: {}", key)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, key: &str, image: &ImageUpload) -> Result<String> {
        if image.data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if image.data.len() > self.max_bytes {
            return Err(AppError::Validation(format!(
                "File too large (max {} MB)",
                self.max_bytes / (1024 * 1024)
            )));
        }
        image.extension()?;

        let file_path = self.path_for(key)?;
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create storage directory: {}", e))
            })?;
        }

        let mut file = fs::File::create(&file_path).await.map_err(|e| {
            AppError::Storage(format!("Failed to create file: {}", e))
        })?;
        file.write_all(&image.data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write file: {}", e))
        })?;
        file.flush().await.map_err(|e| {
            AppError::Storage(format!("Failed to write file: {}", e))
        })?;

        tracing::debug!("Stored object {} ({} bytes)", key, image.data.len());
        Ok(self.url_for(key))
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let Some(key) = self.key_for(url) else {
            tracing::debug!("Ignoring delete for foreign URL {}", url);
            return Ok(());
        };

        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to delete file: {}", e))),
        }
    }
}
