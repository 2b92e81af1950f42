use std::sync::Arc;

use chrono::{Duration, Utc};
use cookie::{Cookie, SameSite};
use sqlx::SqlitePool;

use crate::{
    domain::Identity,
    error::{AppError, Result},
};

pub mod identity;
pub mod session;

pub use identity::{IdentityError, IdentityProvider, LocalIdentityProvider};
use session::{Session, SessionStore};

pub const SESSION_COOKIE: &str = "session";

/// Ties the identity provider to server-side sessions.
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    session_store: SessionStore,
    session_duration_hours: i64,
}

impl AuthService {
    pub fn new(
        pool: SqlitePool,
        identity: Arc<dyn IdentityProvider>,
        session_duration_hours: i64,
    ) -> Self {
        Self {
            identity,
            session_store: SessionStore::new(pool),
            session_duration_hours,
        }
    }

    pub fn identity_provider(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    pub async fn create_session(&self, user_id: &str) -> Result<(Session, String)> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(self.session_duration_hours);

        let session = self.session_store
            .create(user_id, &token, expires_at)
            .await?;

        Ok((session, token))
    }

    /// Resolves a session token to the identity that owns it.
    pub async fn authenticate(&self, token: &str) -> Result<Identity> {
        let session = self.session_store
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        self.identity
            .find(&session.user_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    pub async fn invalidate_session(&self, token: &str) -> Result<()> {
        self.session_store.delete_by_token(token).await
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.session_store.cleanup_expired().await
    }

    pub fn create_session_cookie(&self, token: &str, secure: bool) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(secure)
            .max_age(cookie::time::Duration::hours(self.session_duration_hours))
            .build()
    }

    pub fn create_logout_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .max_age(cookie::time::Duration::seconds(0))
            .build()
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
