use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    domain::User,
    error::{AppError, Result},
    repository::UserRepository,
};

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn upsert(&self, user: User) -> Result<User> {
        // ON CONFLICT keeps the row in place; REPLACE would delete it and
        // cascade to the user's announcements and comments.
        sqlx::query(
            r#"
            INSERT INTO users (
                uid, display_name, email, contact_number, document_number,
                apartment_number, about_me, profile_image_url
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(uid) DO UPDATE SET
                display_name = excluded.display_name,
                email = excluded.email,
                contact_number = excluded.contact_number,
                document_number = excluded.document_number,
                apartment_number = excluded.apartment_number,
                about_me = excluded.about_me,
                profile_image_url = excluded.profile_image_url
            "#
        )
        .bind(&user.uid)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(&user.contact_number)
        .bind(&user.document_number)
        .bind(&user.apartment_number)
        .bind(&user.about_me)
        .bind(&user.profile_image_url)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(&user.uid).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve saved user".to_string())
        })
    }

    async fn update(&self, user: User) -> Result<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET display_name = ?, email = ?, contact_number = ?, document_number = ?,
                apartment_number = ?, about_me = ?, profile_image_url = ?
            WHERE uid = ?
            "#
        )
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(&user.contact_number)
        .bind(&user.document_number)
        .bind(&user.apartment_number)
        .bind(&user.about_me)
        .bind(&user.profile_image_url)
        .bind(&user.uid)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Profile not found.".to_string()));
        }

        Ok(user)
    }

    async fn find_by_id(&self, uid: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT uid, display_name, email, contact_number, document_number,
                   apartment_number, about_me, profile_image_url
            FROM users
            WHERE uid = ?
            "#
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(user)
    }

    async fn delete(&self, uid: &str) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE uid = ?")
            .bind(uid)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
