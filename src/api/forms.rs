use std::collections::HashMap;

use axum::extract::Multipart;

use crate::{
    error::{AppError, Result},
    storage::ImageUpload,
};

const IMAGE_FIELD: &str = "image";

/// Text fields plus the optional `image` file of a multipart form.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

impl FormData {
    pub async fn parse(mut multipart: Multipart) -> Result<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == IMAGE_FIELD {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read image: {}", e)))?;
                // Browsers send an empty part when no file was picked
                if !filename.is_empty() && !data.is_empty() {
                    form.image = Some(ImageUpload { filename, data: data.to_vec() });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field {}: {}", name, e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Removes and returns a text field, `None` when it was not sent.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn take_or_default(&mut self, name: &str) -> String {
        self.take(name).unwrap_or_default()
    }
}
