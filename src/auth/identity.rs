use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::{domain::Identity, error::AppError};

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("The password is too weak.")]
    WeakPassword,

    #[error("The email address is invalid.")]
    InvalidEmail,

    #[error("The email address is already registered.")]
    EmailInUse,

    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Identity backend error: {0}")]
    Backend(String),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::WeakPassword | IdentityError::InvalidEmail => {
                AppError::Validation(err.to_string())
            }
            IdentityError::EmailInUse => AppError::Conflict(err.to_string()),
            IdentityError::InvalidCredentials => AppError::Authentication(err.to_string()),
            IdentityError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        IdentityError::Backend(err.to_string())
    }
}

/// The account authority. It owns credentials and hands out stable uids.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn register(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;
    async fn find(&self, uid: &str) -> Result<Option<Identity>, IdentityError>;
}

#[derive(FromRow)]
struct CredentialRow {
    uid: String,
    email: String,
    password_hash: String,
}

/// Identity provider backed by the `credentials` table.
pub struct LocalIdentityProvider {
    pool: SqlitePool,
    min_password_length: usize,
}

impl LocalIdentityProvider {
    pub fn new(pool: SqlitePool, min_password_length: usize) -> Self {
        Self { pool, min_password_length }
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRow>, IdentityError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT uid, email, password_hash FROM credentials WHERE email = ?"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn register(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let email = Self::normalize_email(email);
        if !email.validate_email() {
            return Err(IdentityError::InvalidEmail);
        }
        if password.chars().count() < self.min_password_length {
            return Err(IdentityError::WeakPassword);
        }
        if self.find_by_email(&email).await?.is_some() {
            return Err(IdentityError::EmailInUse);
        }

        let password_hash = hash_password(password)?;
        let uid = Uuid::new_v4().simple().to_string();

        sqlx::query(
            r#"
            INSERT INTO credentials (uid, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#
        )
        .bind(&uid)
        .bind(&email)
        .bind(&password_hash)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration for the same email
            sqlx::Error::Database(ref db) if db.is_unique_violation() => IdentityError::EmailInUse,
            other => IdentityError::from(other),
        })?;

        tracing::info!("Registered identity {}", uid);
        Ok(Identity { uid, email })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let email = Self::normalize_email(email);
        let row = self
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !verify_password(password, &row.password_hash)? {
            return Err(IdentityError::InvalidCredentials);
        }

        Ok(Identity { uid: row.uid, email: row.email })
    }

    async fn find(&self, uid: &str) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT uid, email, password_hash FROM credentials WHERE uid = ?"
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Identity { uid: r.uid, email: r.email }))
    }
}

pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| IdentityError::Backend(format!("Password hashing failed: {}", e)))?;

    Ok(password_hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, IdentityError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| IdentityError::Backend(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
}
