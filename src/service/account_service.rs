use std::sync::Arc;

use serde::Serialize;

use crate::{
    auth::AuthService,
    domain::User,
    error::{AppError, Result},
    repository::UserRepository,
};

/// Where the client should go after a successful sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    SetupProfile,
    Main,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthOutcome {
    pub uid: String,
    pub email: String,
    pub token: String,
    pub next: NextStep,
}

pub struct AccountService {
    auth: Arc<AuthService>,
    user_repo: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(auth: Arc<AuthService>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self { auth, user_repo }
    }

    fn credentials(email: &str, password: &str) -> Result<(String, String)> {
        let email = email.trim();
        let password = password.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Please enter email and password.".to_string()));
        }
        Ok((email.to_string(), password.to_string()))
    }

    /// Creates the account, stores a bare profile and opens a session.
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthOutcome> {
        let (email, password) = Self::credentials(email, password)?;

        let identity = self.auth.identity_provider().register(&email, &password).await?;
        self.user_repo
            .upsert(User::basic(&identity.uid, &identity.email))
            .await?;
        tracing::debug!("Basic profile stored for {}", identity.uid);

        let (_session, token) = self.auth.create_session(&identity.uid).await?;

        Ok(AuthOutcome {
            uid: identity.uid,
            email: identity.email,
            token,
            next: NextStep::SetupProfile,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome> {
        let (email, password) = Self::credentials(email, password)?;

        let identity = self.auth.identity_provider().sign_in(&email, &password).await?;
        let (_session, token) = self.auth.create_session(&identity.uid).await?;

        // An account whose local profile is gone has to go through setup again
        let next = match self.user_repo.find_by_id(&identity.uid).await? {
            Some(_) => NextStep::Main,
            None => NextStep::SetupProfile,
        };
        tracing::debug!("Signed in {}", identity.uid);

        Ok(AuthOutcome {
            uid: identity.uid,
            email: identity.email,
            token,
            next,
        })
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        self.auth.invalidate_session(token).await
    }
}
