use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use splikz_backend::domain::{
    boost::{Boost, BoostLevel, BOOST_STATUS_ACTIVE},
    profile::ProfileRow,
    splik::Splik,
};
use sqlx::PgPool;
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

const SPLIK_COLUMNS: &str = r#"
    id, user_id, title, description, video_url, thumbnail_url, duration,
    file_size, mime_type, status, trim_start, trim_end, views, likes_count,
    comments_count, boost_score, is_currently_boosted, created_at, updated_at
"#;

const PROFILE_COLUMNS: &str = r#"
    id, username, handle, display_name, first_name, last_name, avatar_url,
    bio, city, followers_count, following_count, spliks_count, is_private,
    followers_private, following_private, created_at
"#;

const BOOST_COLUMNS: &str = r#"
    id, splik_id, user_id, boost_level, amount, start_date, end_date, status,
    stripe_payment_intent_id, impressions_gained, created_at
"#;

/// Seeds rows straight into Postgres. Every row gets a later `created_at`
/// than the one before it, so creation order is also recency order.
pub struct TestFixtures {
    pool: PgPool,
    clock: AtomicI64,
    epoch: DateTime<Utc>,
}

impl TestFixtures {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            clock: AtomicI64::new(0),
            epoch: Utc::now() - Duration::hours(1),
        }
    }

    fn tick(&self) -> DateTime<Utc> {
        self.epoch + Duration::seconds(self.clock.fetch_add(1, Ordering::SeqCst))
    }

    pub async fn create_profile(&self, username: &str) -> Result<ProfileRow> {
        let row = ProfileRow {
            id: Uuid::new_v4(),
            username: Some(username.to_string()),
            display_name: Some(format!("{} display", username)),
            followers_count: Some(0),
            following_count: Some(0),
            spliks_count: Some(0),
            is_private: Some(false),
            created_at: Some(self.tick()),
            ..Default::default()
        };
        self.insert_profile(&row).await?;
        Ok(row)
    }

    /// Store a row as given; unset counters and flags take the column defaults
    pub async fn insert_profile(&self, row: &ProfileRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, username, handle, display_name, first_name, last_name,
                avatar_url, bio, city, followers_count, following_count,
                spliks_count, is_private, followers_private, following_private,
                created_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9,
                COALESCE($10, 0), COALESCE($11, 0), COALESCE($12, 0),
                COALESCE($13, FALSE), COALESCE($14, FALSE), COALESCE($15, FALSE),
                COALESCE($16, NOW())
            )
            "#,
        )
        .bind(row.id)
        .bind(&row.username)
        .bind(&row.handle)
        .bind(&row.display_name)
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(&row.avatar_url)
        .bind(&row.bio)
        .bind(&row.city)
        .bind(row.followers_count)
        .bind(row.following_count)
        .bind(row.spliks_count)
        .bind(row.is_private)
        .bind(row.followers_private)
        .bind(row.following_private)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn create_splik(&self, owner: Uuid, title: &str) -> Result<Splik> {
        self.insert_splik(owner, title, 0, false).await
    }

    async fn insert_splik(
        &self,
        owner: Uuid,
        title: &str,
        boost_score: i32,
        is_currently_boosted: bool,
    ) -> Result<Splik> {
        let created_at = self.tick();
        let splik = sqlx::query_as::<_, Splik>(&format!(
            r#"
            INSERT INTO spliks (
                user_id, title, video_url, duration, file_size, mime_type,
                trim_start, trim_end, boost_score, is_currently_boosted,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, 3.0, 1024, 'video/mp4', 0.0, 3.0, $4, $5, $6, $6)
            RETURNING {}
            "#,
            SPLIK_COLUMNS
        ))
        .bind(owner)
        .bind(title)
        .bind(format!("https://storage.test/spliks/{}/{}.mp4", owner, title))
        .bind(boost_score)
        .bind(is_currently_boosted)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(splik)
    }

    /// A splik with a paid boost ending `ends_in` from now
    pub async fn create_boosted_splik(
        &self,
        owner: Uuid,
        title: &str,
        level: BoostLevel,
        ends_in: Duration,
    ) -> Result<Splik> {
        let splik = self
            .insert_splik(owner, title, level.boost_score(), true)
            .await?;
        self.add_boost(&splik, level, ends_in).await?;
        Ok(splik)
    }

    /// Another active boost row for `splik`, newer than any before it
    pub async fn add_boost(
        &self,
        splik: &Splik,
        level: BoostLevel,
        ends_in: Duration,
    ) -> Result<Boost> {
        let now = Utc::now();
        let boost = sqlx::query_as::<_, Boost>(&format!(
            r#"
            INSERT INTO boosted_videos (
                splik_id, user_id, boost_level, amount, start_date, end_date,
                status, stripe_payment_intent_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            BOOST_COLUMNS
        ))
        .bind(splik.id)
        .bind(splik.user_id)
        .bind(level.as_str())
        .bind(level.price_cents())
        .bind(now - Duration::days(1))
        .bind(now + ends_in)
        .bind(BOOST_STATUS_ACTIVE)
        .bind(format!("pi_seeded_{}", Uuid::new_v4().simple()))
        .bind(self.tick())
        .fetch_one(&self.pool)
        .await?;

        Ok(boost)
    }

    pub async fn get_splik(&self, id: Uuid) -> Result<Splik> {
        let splik = sqlx::query_as::<_, Splik>(&format!(
            "SELECT {} FROM spliks WHERE id = $1",
            SPLIK_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(splik)
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<ProfileRow> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Oldest first
    pub async fn get_boosts(&self, splik_id: Uuid) -> Result<Vec<Boost>> {
        let boosts = sqlx::query_as::<_, Boost>(&format!(
            "SELECT {} FROM boosted_videos WHERE splik_id = $1 ORDER BY created_at",
            BOOST_COLUMNS
        ))
        .bind(splik_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(boosts)
    }

    pub async fn get_comment_count(&self, splik_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE splik_id = $1")
            .bind(splik_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
