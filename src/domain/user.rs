use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile record keyed by the identity provider's unique id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub document_number: Option<String>,
    pub apartment_number: Option<String>,
    pub about_me: Option<String>,
    pub profile_image_url: Option<String>,
}

impl User {
    /// The bare profile written right after registration.
    pub fn basic(uid: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            uid: uid.into(),
            display_name: email.clone(),
            email,
            contact_number: None,
            document_number: None,
            apartment_number: None,
            about_me: None,
            profile_image_url: None,
        }
    }

    /// Name shown next to the user's posts, falling back to the email.
    pub fn author_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.email
        } else {
            &self.display_name
        }
    }
}

/// Account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// Profile form shared by the setup and edit screens. Every field is
/// optional on the wire; each screen decides which ones it requires.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub display_name: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub contact_number: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub document_number: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub apartment_number: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub about_me: Option<String>,
}
