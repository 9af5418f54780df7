pub mod error;
pub mod service;
pub mod toggle;

pub use error::SocialServiceError;
pub use service::{SocialService, SocialServiceApi};
pub use toggle::{
    optimistic_toggle, LogNotifier, Notifier, ToggleControl, ToggleRollback, ToggleState,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;

/// A boolean relation between a user and a splik or another profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    Like,
    Favorite,
    Follow,
}

impl Membership {
    /// Verb used in sign-in prompts
    pub fn action(&self) -> &'static str {
        match self {
            Membership::Like => "like spliks",
            Membership::Favorite => "save favorites",
            Membership::Follow => "follow creators",
        }
    }
}

/// Row-level membership storage. Inserts and deletes are idempotent and
/// return the target's counter after the change.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn exists(&self, kind: Membership, user_id: Uuid, target_id: Uuid) -> AppResult<bool>;
    async fn insert(&self, kind: Membership, user_id: Uuid, target_id: Uuid) -> AppResult<i64>;
    async fn delete(&self, kind: Membership, user_id: Uuid, target_id: Uuid) -> AppResult<i64>;
    async fn count(&self, kind: Membership, target_id: Uuid) -> AppResult<i64>;
    /// Targets of the user's memberships, most recent first
    async fn list_targets(&self, kind: Membership, user_id: Uuid) -> AppResult<Vec<Uuid>>;
}
