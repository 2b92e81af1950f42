use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, Sqlite, SqlitePool};

use crate::{
    domain::Announcement,
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    description: String,
    author_id: String,
    author_email: String,
    author_display_name: String,
    author_profile_image_url: Option<String>,
    image_url: Option<String>,
    timestamp: NaiveDateTime,
}

impl From<AnnouncementRow> for Announcement {
    fn from(row: AnnouncementRow) -> Self {
        Announcement {
            id: row.id,
            title: row.title,
            description: row.description,
            author_id: row.author_id,
            author_email: row.author_email,
            author_display_name: row.author_display_name,
            author_profile_image_url: row.author_profile_image_url,
            image_url: row.image_url,
            timestamp: DateTime::from_naive_utc_and_offset(row.timestamp, Utc),
        }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, title, description, author_id, author_email, author_display_name,
           author_profile_image_url, image_url, timestamp
    FROM announcements
"#;

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn upsert<'e, E>(executor: E, announcement: &Announcement) -> Result<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        // Updating in place keeps the comments attached; a REPLACE would
        // cascade-delete them.
        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, title, description, author_id, author_email, author_display_name,
                author_profile_image_url, image_url, timestamp
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                author_id = excluded.author_id,
                author_email = excluded.author_email,
                author_display_name = excluded.author_display_name,
                author_profile_image_url = excluded.author_profile_image_url,
                image_url = excluded.image_url,
                timestamp = excluded.timestamp
            "#
        )
        .bind(&announcement.id)
        .bind(&announcement.title)
        .bind(&announcement.description)
        .bind(&announcement.author_id)
        .bind(&announcement.author_email)
        .bind(&announcement.author_display_name)
        .bind(&announcement.author_profile_image_url)
        .bind(&announcement.image_url)
        .bind(announcement.timestamp.naive_utc())
        .execute(executor)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn insert(&self, announcement: Announcement) -> Result<Announcement> {
        Self::upsert(&self.pool, &announcement).await?;

        self.find_by_id(&announcement.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn insert_all(&self, announcements: Vec<Announcement>) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for announcement in &announcements {
            Self::upsert(&mut *tx, announcement).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn update(&self, announcement: Announcement) -> Result<Announcement> {
        let result = sqlx::query(
            r#"
            UPDATE announcements
            SET title = ?, description = ?, author_id = ?, author_email = ?,
                author_display_name = ?, author_profile_image_url = ?,
                image_url = ?, timestamp = ?
            WHERE id = ?
            "#
        )
        .bind(&announcement.title)
        .bind(&announcement.description)
        .bind(&announcement.author_id)
        .bind(&announcement.author_email)
        .bind(&announcement.author_display_name)
        .bind(&announcement.author_profile_image_url)
        .bind(&announcement.image_url)
        .bind(announcement.timestamp.naive_utc())
        .bind(&announcement.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Announcement not found.".to_string()));
        }

        self.find_by_id(&announcement.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated announcement".to_string())
        })
    }

    async fn update_without_comments(&self, announcement: Announcement) -> Result<Option<Announcement>> {
        let result = sqlx::query(
            r#"
            UPDATE announcements
            SET title = ?, description = ?, author_id = ?, author_email = ?,
                author_display_name = ?, author_profile_image_url = ?,
                image_url = ?, timestamp = ?
            WHERE id = ?
              AND NOT EXISTS (SELECT 1 FROM comments WHERE announcement_id = ?)
            "#
        )
        .bind(&announcement.title)
        .bind(&announcement.description)
        .bind(&announcement.author_id)
        .bind(&announcement.author_email)
        .bind(&announcement.author_display_name)
        .bind(&announcement.author_profile_image_url)
        .bind(&announcement.image_url)
        .bind(announcement.timestamp.naive_utc())
        .bind(&announcement.id)
        .bind(&announcement.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(&announcement.id).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, AnnouncementRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(Announcement::from))
    }

    async fn list_all(&self) -> Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(&format!(
            "{} ORDER BY timestamp DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Announcement::from).collect())
    }

    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(&format!(
            "{} WHERE author_id = ? ORDER BY timestamp DESC",
            SELECT_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Announcement::from).collect())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_without_comments(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM announcements
            WHERE id = ?
              AND NOT EXISTS (SELECT 1 FROM comments WHERE announcement_id = ?)
            "#
        )
        .bind(id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM announcements")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
