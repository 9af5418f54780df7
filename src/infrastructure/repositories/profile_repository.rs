use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::profile::{ProfileChanges, ProfileRepository, ProfileRow};
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::DbPool;

const PROFILE_COLUMNS: &str = r#"
    p.id, p.username, p.handle, p.display_name, p.first_name, p.last_name,
    p.avatar_url, p.bio, p.city, p.followers_count, p.following_count,
    p.spliks_count, p.is_private, p.followers_private, p.following_private,
    p.created_at
"#;

pub struct PgProfileRepository {
    pool: Arc<DbPool>,
}

impl PgProfileRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProfileRow>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM profiles p WHERE p.id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<ProfileRow>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM profiles p WHERE p.id = ANY($1)",
            PROFILE_COLUMNS
        ))
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn followers(&self, profile_id: Uuid) -> AppResult<Vec<ProfileRow>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            SELECT {}
            FROM followers f
            JOIN profiles p ON p.id = f.follower_id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC
            "#,
            PROFILE_COLUMNS
        ))
        .bind(profile_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn following(&self, profile_id: Uuid) -> AppResult<Vec<ProfileRow>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            SELECT {}
            FROM followers f
            JOIN profiles p ON p.id = f.following_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            "#,
            PROFILE_COLUMNS
        ))
        .bind(profile_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn recent(&self, limit: i64) -> AppResult<Vec<ProfileRow>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM profiles p ORDER BY p.created_at DESC LIMIT $1",
            PROFILE_COLUMNS
        ))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn update(&self, id: Uuid, changes: &ProfileChanges) -> AppResult<Option<ProfileRow>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            UPDATE profiles AS p
            SET username = COALESCE($2, p.username),
                display_name = COALESCE($3, p.display_name),
                bio = COALESCE($4, p.bio),
                city = COALESCE($5, p.city),
                avatar_url = COALESCE($6, p.avatar_url),
                followers_private = COALESCE($7, p.followers_private),
                following_private = COALESCE($8, p.following_private)
            WHERE p.id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.display_name)
        .bind(&changes.bio)
        .bind(&changes.city)
        .bind(&changes.avatar_url)
        .bind(changes.followers_private)
        .bind(changes.following_private)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Username already taken".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row)
    }
}
