use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{Comment, NewComment},
    error::{AppError, Result},
    repository::CommentRepository,
};

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    announcement_id: String,
    author_id: String,
    author_display_name: String,
    author_profile_image_url: Option<String>,
    text: String,
    timestamp: NaiveDateTime,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            announcement_id: row.announcement_id,
            author_id: row.author_id,
            author_display_name: row.author_display_name,
            author_profile_image_url: row.author_profile_image_url,
            text: row.text,
            timestamp: DateTime::from_naive_utc_and_offset(row.timestamp, Utc),
        }
    }
}

pub struct SqliteCommentRepository {
    pool: SqlitePool,
}

impl SqliteCommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqliteCommentRepository {
    async fn insert(&self, comment: NewComment) -> Result<Comment> {
        let result = sqlx::query(
            r#"
            INSERT INTO comments (
                announcement_id, author_id, author_display_name,
                author_profile_image_url, text, timestamp
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&comment.announcement_id)
        .bind(&comment.author_id)
        .bind(&comment.author_display_name)
        .bind(&comment.author_profile_image_url)
        .bind(&comment.text)
        .bind(comment.timestamp.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created comment".to_string())
        })
    }

    async fn insert_all(&self, comments: Vec<Comment>) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for comment in &comments {
            sqlx::query(
                r#"
                INSERT INTO comments (
                    id, announcement_id, author_id, author_display_name,
                    author_profile_image_url, text, timestamp
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    announcement_id = excluded.announcement_id,
                    author_id = excluded.author_id,
                    author_display_name = excluded.author_display_name,
                    author_profile_image_url = excluded.author_profile_image_url,
                    text = excluded.text,
                    timestamp = excluded.timestamp
                "#
            )
            .bind(comment.id)
            .bind(&comment.announcement_id)
            .bind(&comment.author_id)
            .bind(&comment.author_display_name)
            .bind(&comment.author_profile_image_url)
            .bind(&comment.text)
            .bind(comment.timestamp.naive_utc())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn update(&self, comment: Comment) -> Result<Comment> {
        let result = sqlx::query(
            r#"
            UPDATE comments
            SET author_display_name = ?, author_profile_image_url = ?, text = ?, timestamp = ?
            WHERE id = ?
            "#
        )
        .bind(&comment.author_display_name)
        .bind(&comment.author_profile_image_url)
        .bind(&comment.text)
        .bind(comment.timestamp.naive_utc())
        .bind(comment.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Comment not found.".to_string()));
        }

        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, announcement_id, author_id, author_display_name,
                   author_profile_image_url, text, timestamp
            FROM comments
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(Comment::from))
    }

    async fn list_for_announcement(&self, announcement_id: &str) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, announcement_id, author_id, author_display_name,
                   author_profile_image_url, text, timestamp
            FROM comments
            WHERE announcement_id = ?
            ORDER BY timestamp ASC, id ASC
            "#
        )
        .bind(announcement_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn count_for_announcement(&self, announcement_id: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments WHERE announcement_id = ?"
        )
        .bind(announcement_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_for_announcement(&self, announcement_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE announcement_id = ?")
            .bind(announcement_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM comments")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
