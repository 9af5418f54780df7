use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::splik::{NewSplik, Splik, SplikRepository, ViewOutcome, ViewRecord};
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::DbPool;

const SPLIK_COLUMNS: &str = r#"
    s.id, s.user_id, s.title, s.description, s.video_url, s.thumbnail_url,
    s.duration, s.file_size, s.mime_type, s.status, s.trim_start, s.trim_end,
    s.views, s.likes_count, s.comments_count, s.boost_score,
    s.is_currently_boosted, s.created_at, s.updated_at
"#;

pub struct PgSplikRepository {
    pool: Arc<DbPool>,
}

impl PgSplikRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SplikRepository for PgSplikRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Splik>> {
        let splik = sqlx::query_as::<_, Splik>(&format!(
            "SELECT {} FROM spliks s WHERE s.id = $1",
            SPLIK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(splik)
    }

    async fn find_organic(&self, limit: i64) -> AppResult<Vec<Splik>> {
        let spliks = sqlx::query_as::<_, Splik>(&format!(
            r#"
            SELECT {}
            FROM spliks s
            WHERE s.boost_score = 0 AND s.status = 'active'
            ORDER BY s.created_at DESC
            LIMIT $1
            "#,
            SPLIK_COLUMNS
        ))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(spliks)
    }

    async fn find_promoted(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<Splik>> {
        let spliks = sqlx::query_as::<_, Splik>(&format!(
            r#"
            SELECT {}
            FROM spliks s
            WHERE s.boost_score > 0
              AND s.status = 'active'
              AND EXISTS (
                  SELECT 1 FROM boosted_videos b
                  WHERE b.splik_id = s.id AND b.status = 'active' AND b.end_date > $1
              )
            ORDER BY s.boost_score DESC, s.created_at DESC
            LIMIT $2
            "#,
            SPLIK_COLUMNS
        ))
        .bind(now)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(spliks)
    }

    async fn find_recent(&self, limit: i64) -> AppResult<Vec<Splik>> {
        let spliks = sqlx::query_as::<_, Splik>(&format!(
            r#"
            SELECT {}
            FROM spliks s
            WHERE s.status = 'active'
            ORDER BY s.created_at DESC
            LIMIT $1
            "#,
            SPLIK_COLUMNS
        ))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(spliks)
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Splik>> {
        let spliks = sqlx::query_as::<_, Splik>(&format!(
            "SELECT {} FROM spliks s WHERE s.user_id = $1 ORDER BY s.created_at DESC",
            SPLIK_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(spliks)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Splik>> {
        let spliks = sqlx::query_as::<_, Splik>(&format!(
            "SELECT {} FROM spliks s WHERE s.id = ANY($1)",
            SPLIK_COLUMNS
        ))
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(spliks)
    }

    async fn create(&self, splik: NewSplik) -> AppResult<Splik> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Splik>(&format!(
            r#"
            INSERT INTO spliks AS s (
                user_id, title, description, video_url, thumbnail_url,
                duration, file_size, mime_type, trim_start, trim_end
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            SPLIK_COLUMNS
        ))
        .bind(splik.user_id)
        .bind(&splik.title)
        .bind(&splik.description)
        .bind(&splik.video_url)
        .bind(&splik.thumbnail_url)
        .bind(splik.duration)
        .bind(splik.file_size)
        .bind(&splik.mime_type)
        .bind(splik.trim_start)
        .bind(splik.trim_end)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::BadRequest("Create a profile before uploading".to_string())
            }
            _ => AppError::Database(e),
        })?;

        sqlx::query("UPDATE profiles SET spliks_count = spliks_count + 1 WHERE id = $1")
            .bind(splik.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn record_view(&self, view: ViewRecord) -> AppResult<ViewOutcome> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO video_views (splik_id, session_id, viewer_id, ip_address)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (splik_id, session_id) DO NOTHING
            "#,
        )
        .bind(view.splik_id)
        .bind(&view.session_id)
        .bind(view.viewer_id)
        .bind(&view.ip_address)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        let view_count = if inserted {
            sqlx::query_scalar::<_, i64>(
                "UPDATE spliks SET views = views + 1 WHERE id = $1 RETURNING views",
            )
            .bind(view.splik_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_scalar::<_, i64>("SELECT views FROM spliks WHERE id = $1")
                .bind(view.splik_id)
                .fetch_one(&mut *tx)
                .await?
        };

        tx.commit().await?;
        Ok(ViewOutcome {
            new_view: inserted,
            view_count,
        })
    }
}
