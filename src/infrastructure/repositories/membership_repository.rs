use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::social::{Membership, MembershipRepository};
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::DbPool;

struct Relation {
    table: &'static str,
    user_column: &'static str,
    target_column: &'static str,
}

fn relation(kind: Membership) -> Relation {
    match kind {
        Membership::Like => Relation {
            table: "likes",
            user_column: "user_id",
            target_column: "splik_id",
        },
        Membership::Favorite => Relation {
            table: "favorites",
            user_column: "user_id",
            target_column: "splik_id",
        },
        Membership::Follow => Relation {
            table: "followers",
            user_column: "follower_id",
            target_column: "following_id",
        },
    }
}

pub struct PgMembershipRepository {
    pool: Arc<DbPool>,
}

impl PgMembershipRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Apply a +1/-1 change to the denormalized counters
    async fn bump_counters(
        tx: &mut Transaction<'_, Postgres>,
        kind: Membership,
        user_id: Uuid,
        target_id: Uuid,
        delta: i64,
    ) -> AppResult<()> {
        match kind {
            Membership::Like => {
                sqlx::query(
                    "UPDATE spliks SET likes_count = GREATEST(likes_count + $2, 0) WHERE id = $1",
                )
                .bind(target_id)
                .bind(delta)
                .execute(&mut **tx)
                .await?;
            }
            Membership::Follow => {
                sqlx::query(
                    "UPDATE profiles SET followers_count = GREATEST(followers_count + $2, 0) WHERE id = $1",
                )
                .bind(target_id)
                .bind(delta)
                .execute(&mut **tx)
                .await?;
                sqlx::query(
                    "UPDATE profiles SET following_count = GREATEST(following_count + $2, 0) WHERE id = $1",
                )
                .bind(user_id)
                .bind(delta)
                .execute(&mut **tx)
                .await?;
            }
            Membership::Favorite => {}
        }
        Ok(())
    }

    async fn count_in(
        tx: &mut Transaction<'_, Postgres>,
        kind: Membership,
        target_id: Uuid,
    ) -> AppResult<i64> {
        let sql = match kind {
            Membership::Like => "SELECT likes_count FROM spliks WHERE id = $1",
            Membership::Follow => "SELECT followers_count FROM profiles WHERE id = $1",
            Membership::Favorite => "SELECT COUNT(*) FROM favorites WHERE splik_id = $1",
        };
        let count = sqlx::query_scalar::<_, i64>(sql)
            .bind(target_id)
            .fetch_optional(&mut **tx)
            .await?
            .unwrap_or(0);
        Ok(count)
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn exists(&self, kind: Membership, user_id: Uuid, target_id: Uuid) -> AppResult<bool> {
        let rel = relation(kind);
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND {} = $2)",
            rel.table, rel.user_column, rel.target_column
        ))
        .bind(user_id)
        .bind(target_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn insert(&self, kind: Membership, user_id: Uuid, target_id: Uuid) -> AppResult<i64> {
        let rel = relation(kind);
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(&format!(
            "INSERT INTO {} ({}, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            rel.table, rel.user_column, rel.target_column
        ))
        .bind(user_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            // Targets are checked up front, so a missing row is the caller's profile
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::BadRequest(format!("Create a profile to {}", kind.action()))
            }
            _ => AppError::Database(e),
        })?
        .rows_affected();

        if inserted > 0 {
            Self::bump_counters(&mut tx, kind, user_id, target_id, 1).await?;
        }
        let count = Self::count_in(&mut tx, kind, target_id).await?;

        tx.commit().await?;
        Ok(count)
    }

    async fn delete(&self, kind: Membership, user_id: Uuid, target_id: Uuid) -> AppResult<i64> {
        let rel = relation(kind);
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = $1 AND {} = $2",
            rel.table, rel.user_column, rel.target_column
        ))
        .bind(user_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted > 0 {
            Self::bump_counters(&mut tx, kind, user_id, target_id, -1).await?;
        }
        let count = Self::count_in(&mut tx, kind, target_id).await?;

        tx.commit().await?;
        Ok(count)
    }

    async fn count(&self, kind: Membership, target_id: Uuid) -> AppResult<i64> {
        let mut tx = self.pool.begin().await?;
        let count = Self::count_in(&mut tx, kind, target_id).await?;
        tx.commit().await?;
        Ok(count)
    }

    async fn list_targets(&self, kind: Membership, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let rel = relation(kind);
        let ids = sqlx::query_scalar::<_, Uuid>(&format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY created_at DESC",
            rel.target_column, rel.table, rel.user_column
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(ids)
    }
}
