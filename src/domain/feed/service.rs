use async_trait::async_trait;
use chrono::Utc;
use std::num::NonZeroUsize;
use std::sync::Arc;
use uuid::Uuid;

use super::error::FeedServiceError;
use super::mixer::{compose, dispatch_impressions, partition, ImpressionRecorder, Placement};
use super::{ExploreResponse, FeedItemResponse, DEFAULT_PROMOTION_INTERVAL};
use crate::domain::auth::Session;
use crate::domain::profile::service::RISING_CREATORS_LIMIT;
use crate::domain::profile::{ProfileService, ProfileServiceApi};
use crate::domain::splik::{Splik, SplikRepository};

#[derive(Debug, Clone, Copy)]
pub struct FeedSettings {
    pub page_size: i64,
    pub promoted_page_size: i64,
    pub promotion_interval: NonZeroUsize,
}

impl FeedSettings {
    pub fn new(
        page_size: i64,
        promoted_page_size: i64,
        promotion_interval: usize,
    ) -> Result<Self, FeedServiceError> {
        if page_size <= 0 {
            return Err(FeedServiceError::Settings(format!(
                "page size must be positive, got {}",
                page_size
            )));
        }
        if promoted_page_size < 0 {
            return Err(FeedServiceError::Settings(format!(
                "promoted page size cannot be negative, got {}",
                promoted_page_size
            )));
        }
        let promotion_interval = NonZeroUsize::new(promotion_interval).ok_or_else(|| {
            FeedServiceError::Settings("promotion interval must be positive".to_string())
        })?;

        Ok(Self {
            page_size,
            promoted_page_size,
            promotion_interval,
        })
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            promoted_page_size: 10,
            promotion_interval: DEFAULT_PROMOTION_INTERVAL,
        }
    }
}

pub struct FeedService {
    splik_repo: Arc<dyn SplikRepository>,
    profile_service: Arc<ProfileService>,
    impressions: Arc<dyn ImpressionRecorder>,
    settings: FeedSettings,
}

impl FeedService {
    pub fn new(
        splik_repo: Arc<dyn SplikRepository>,
        profile_service: Arc<ProfileService>,
        impressions: Arc<dyn ImpressionRecorder>,
        settings: FeedSettings,
    ) -> Self {
        Self {
            splik_repo,
            profile_service,
            impressions,
            settings,
        }
    }

    async fn attach_profiles(
        &self,
        entries: Vec<(Splik, bool)>,
    ) -> Result<Vec<FeedItemResponse>, FeedServiceError> {
        let creator_ids: Vec<Uuid> = entries.iter().map(|(s, _)| s.user_id).collect();
        let profiles = self.profile_service.get_many(&creator_ids).await?;

        Ok(entries
            .into_iter()
            .map(|(splik, is_boosted)| FeedItemResponse {
                profile: profiles.get(&splik.user_id).cloned(),
                splik,
                is_boosted,
            })
            .collect())
    }
}

#[async_trait]
pub trait FeedServiceApi: Send + Sync {
    /// Home feed: organic spliks with promoted ones mixed in.
    ///
    /// One impression is recorded per promoted splik placed. Recording runs
    /// in the background and never delays or fails the feed.
    async fn home_feed(&self, session: &Session) -> Result<Vec<FeedItemResponse>, FeedServiceError>;

    /// Latest spliks and newest creators, without promoted placement
    async fn explore(&self) -> Result<ExploreResponse, FeedServiceError>;
}

#[async_trait]
impl FeedServiceApi for FeedService {
    async fn home_feed(&self, session: &Session) -> Result<Vec<FeedItemResponse>, FeedServiceError> {
        let organic = self.splik_repo.find_organic(self.settings.page_size).await?;
        // Promotion is optional; without it the feed is purely organic
        let promoted = match self
            .splik_repo
            .find_promoted(Utc::now(), self.settings.promoted_page_size)
            .await
        {
            Ok(promoted) => promoted,
            Err(e) => {
                tracing::warn!(error = %e, "Promoted spliks unavailable, serving organic feed");
                Vec::new()
            }
        };

        let (organic, promoted) = partition(organic.into_iter().chain(promoted).collect());
        let feed = compose(organic, promoted, self.settings.promotion_interval);

        let promoted_ids = feed.promoted_ids();
        tracing::debug!(
            user_id = ?session.user_id(),
            items = feed.len(),
            promoted = promoted_ids.len(),
            "Home feed composed"
        );
        if !promoted_ids.is_empty() {
            dispatch_impressions(self.impressions.clone(), promoted_ids);
        }

        let entries = feed
            .into_items()
            .into_iter()
            .map(|placed| (placed.item, placed.placement == Placement::Promoted))
            .collect();
        self.attach_profiles(entries).await
    }

    async fn explore(&self) -> Result<ExploreResponse, FeedServiceError> {
        let recent = self.splik_repo.find_recent(self.settings.page_size).await?;
        let entries = recent
            .into_iter()
            .map(|splik| {
                let boosted = splik.is_currently_boosted;
                (splik, boosted)
            })
            .collect();
        let trending = self.attach_profiles(entries).await?;
        let rising_creators = self.profile_service.recent(RISING_CREATORS_LIMIT).await?;

        Ok(ExploreResponse {
            trending,
            rising_creators,
        })
    }
}
