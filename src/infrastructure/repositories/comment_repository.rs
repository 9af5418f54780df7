use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::splik::{Comment, CommentRepository};
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::DbPool;

pub struct PgCommentRepository {
    pool: Arc<DbPool>,
}

impl PgCommentRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn list(&self, splik_id: Uuid) -> AppResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, splik_id, user_id, content, created_at
            FROM comments
            WHERE splik_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(splik_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(comments)
    }

    async fn create(&self, splik_id: Uuid, user_id: Uuid, content: &str) -> AppResult<Comment> {
        let mut tx = self.pool.begin().await?;

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (splik_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, splik_id, user_id, content, created_at
            "#,
        )
        .bind(splik_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::BadRequest("Create a profile before commenting".to_string())
            }
            _ => AppError::Database(e),
        })?;

        sqlx::query("UPDATE spliks SET comments_count = comments_count + 1 WHERE id = $1")
            .bind(splik_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(comment)
    }

    async fn find(&self, comment_id: Uuid) -> AppResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, splik_id, user_id, content, created_at FROM comments WHERE id = $1",
        )
        .bind(comment_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(comment)
    }

    async fn delete(&self, comment_id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let splik_id: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM comments WHERE id = $1 RETURNING splik_id")
                .bind(comment_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(splik_id) = splik_id else {
            return Ok(false);
        };

        sqlx::query(
            "UPDATE spliks SET comments_count = GREATEST(comments_count - 1, 0) WHERE id = $1",
        )
        .bind(splik_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
