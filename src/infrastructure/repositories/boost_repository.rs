use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::boost::{Boost, BoostRepository, NewBoost, BOOST_STATUS_ACTIVE, BOOST_STATUS_EXPIRED};
use crate::domain::feed::ImpressionRecorder;
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::DbPool;

const BOOST_COLUMNS: &str = r#"
    id, splik_id, user_id, boost_level, amount, start_date, end_date, status,
    stripe_payment_intent_id, impressions_gained, created_at
"#;

pub struct PgBoostRepository {
    pool: Arc<DbPool>,
}

impl PgBoostRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoostRepository for PgBoostRepository {
    async fn activate(&self, boost: NewBoost) -> AppResult<Boost> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Boost>(&format!(
            r#"
            INSERT INTO boosted_videos (
                splik_id, user_id, boost_level, amount, start_date, end_date,
                status, stripe_payment_intent_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            BOOST_COLUMNS
        ))
        .bind(boost.splik_id)
        .bind(boost.user_id)
        .bind(boost.level.as_str())
        .bind(boost.amount)
        .bind(boost.start_date)
        .bind(boost.end_date)
        .bind(BOOST_STATUS_ACTIVE)
        .bind(&boost.payment_intent_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Payment already used".to_string())
            }
            _ => AppError::Database(e),
        })?;

        // A stronger boost already running keeps its score
        sqlx::query(
            r#"
            UPDATE spliks
            SET boost_score = GREATEST(boost_score, $2),
                is_currently_boosted = TRUE,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(boost.splik_id)
        .bind(boost.level.boost_score())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_payment_intent(&self, intent_id: &str) -> AppResult<Option<Boost>> {
        let boost = sqlx::query_as::<_, Boost>(&format!(
            "SELECT {} FROM boosted_videos WHERE stripe_payment_intent_id = $1",
            BOOST_COLUMNS
        ))
        .bind(intent_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(boost)
    }

    async fn expire_old_boosts(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let expired = sqlx::query(
            "UPDATE boosted_videos SET status = $2 WHERE status = $3 AND end_date <= $1",
        )
        .bind(now)
        .bind(BOOST_STATUS_EXPIRED)
        .bind(BOOST_STATUS_ACTIVE)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query(
            r#"
            UPDATE spliks s
            SET boost_score = 0, is_currently_boosted = FALSE, updated_at = NOW()
            WHERE (s.boost_score > 0 OR s.is_currently_boosted)
              AND NOT EXISTS (
                  SELECT 1 FROM boosted_videos b
                  WHERE b.splik_id = s.id AND b.status = $2 AND b.end_date > $1
              )
            "#,
        )
        .bind(now)
        .bind(BOOST_STATUS_ACTIVE)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(expired)
    }
}

#[async_trait]
impl ImpressionRecorder for PgBoostRepository {
    /// Credit the impression to the newest running boost only
    async fn record_impression(&self, splik_id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE boosted_videos
            SET impressions_gained = impressions_gained + 1
            WHERE id = (
                SELECT id FROM boosted_videos
                WHERE splik_id = $1 AND status = $2 AND end_date > NOW()
                ORDER BY created_at DESC
                LIMIT 1
            )
            "#,
        )
        .bind(splik_id)
        .bind(BOOST_STATUS_ACTIVE)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
