use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::error::SocialServiceError;
use super::{Membership, MembershipRepository, ToggleState};
use crate::domain::auth::Session;
use crate::domain::profile::{ProfileService, ProfileServiceApi};
use crate::domain::realtime::{RealtimeEvent, RealtimeHub};
use crate::domain::splik::{Splik, SplikRepository};

pub struct SocialService {
    membership_repo: Arc<dyn MembershipRepository>,
    splik_repo: Arc<dyn SplikRepository>,
    profile_service: Arc<ProfileService>,
    hub: Arc<RealtimeHub>,
}

impl SocialService {
    pub fn new(
        membership_repo: Arc<dyn MembershipRepository>,
        splik_repo: Arc<dyn SplikRepository>,
        profile_service: Arc<ProfileService>,
        hub: Arc<RealtimeHub>,
    ) -> Self {
        Self {
            membership_repo,
            splik_repo,
            profile_service,
            hub,
        }
    }

    async fn ensure_target(&self, kind: Membership, target_id: Uuid) -> Result<(), SocialServiceError> {
        let exists = match kind {
            Membership::Like | Membership::Favorite => {
                self.splik_repo.find_by_id(target_id).await?.is_some()
            }
            Membership::Follow => self.profile_service.find(target_id).await?.is_some(),
        };

        if exists {
            Ok(())
        } else {
            Err(SocialServiceError::NotFound(match kind {
                Membership::Follow => "Profile",
                _ => "Splik",
            }))
        }
    }

    async fn publish(&self, kind: Membership, target_id: Uuid, count: i64) {
        let event = match kind {
            Membership::Like => match self.splik_repo.find_by_id(target_id).await {
                Ok(Some(splik)) => RealtimeEvent::SplikUpdated {
                    splik_id: splik.id,
                    views: splik.views,
                    likes_count: count,
                    comments_count: splik.comments_count,
                },
                Ok(None) => return,
                Err(e) => {
                    tracing::warn!(splik_id = %target_id, error = %e, "Failed to load splik for publish");
                    return;
                }
            },
            Membership::Follow => {
                self.profile_service.invalidate(target_id).await;
                RealtimeEvent::FollowersChanged {
                    profile_id: target_id,
                    followers_count: count,
                }
            }
            // Favorites are private, nothing to broadcast
            Membership::Favorite => return,
        };
        self.hub.publish(event);
    }
}

#[async_trait]
pub trait SocialServiceApi: Send + Sync {
    /// Make the membership match `active` and return the resulting state.
    /// Setting a state that already holds is a no-op.
    async fn set_membership(
        &self,
        session: &Session,
        kind: Membership,
        target_id: Uuid,
        active: bool,
    ) -> Result<ToggleState, SocialServiceError>;

    async fn status(
        &self,
        session: &Session,
        kind: Membership,
        target_id: Uuid,
    ) -> Result<ToggleState, SocialServiceError>;

    /// The caller's favorited spliks, most recently favorited first
    async fn favorites(&self, session: &Session) -> Result<Vec<Splik>, SocialServiceError>;
}

#[async_trait]
impl SocialServiceApi for SocialService {
    async fn set_membership(
        &self,
        session: &Session,
        kind: Membership,
        target_id: Uuid,
        active: bool,
    ) -> Result<ToggleState, SocialServiceError> {
        let user = session.require_user(kind.action())?;

        if kind == Membership::Follow && user.user_id == target_id {
            return Err(SocialServiceError::Invalid(
                "You cannot follow yourself".to_string(),
            ));
        }
        self.ensure_target(kind, target_id).await?;

        let count = if active {
            self.membership_repo
                .insert(kind, user.user_id, target_id)
                .await?
        } else {
            self.membership_repo
                .delete(kind, user.user_id, target_id)
                .await?
        };

        tracing::info!(
            user_id = %user.user_id,
            target_id = %target_id,
            kind = ?kind,
            active,
            count,
            "Membership updated"
        );

        if kind == Membership::Follow {
            // The follower's following_count moved too
            self.profile_service.invalidate(user.user_id).await;
        }
        self.publish(kind, target_id, count).await;
        Ok(ToggleState { active, count })
    }

    async fn status(
        &self,
        session: &Session,
        kind: Membership,
        target_id: Uuid,
    ) -> Result<ToggleState, SocialServiceError> {
        self.ensure_target(kind, target_id).await?;

        let count = self.membership_repo.count(kind, target_id).await?;
        let active = match session.user_id() {
            Some(user_id) => {
                self.membership_repo
                    .exists(kind, user_id, target_id)
                    .await?
            }
            None => false,
        };

        Ok(ToggleState { active, count })
    }

    async fn favorites(&self, session: &Session) -> Result<Vec<Splik>, SocialServiceError> {
        let user = session.require_user(Membership::Favorite.action())?;

        let ids = self
            .membership_repo
            .list_targets(Membership::Favorite, user.user_id)
            .await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut spliks = self.splik_repo.find_by_ids(&ids).await?;
        spliks.sort_by_key(|s| ids.iter().position(|id| *id == s.id));
        Ok(spliks)
    }
}
