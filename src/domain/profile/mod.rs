pub mod model;
pub mod service;

pub use model::{Profile, ProfileRow};
pub use service::{ProfileService, ProfileServiceApi};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;

/// Partial profile edit. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
    pub followers_private: Option<bool>,
    pub following_private: Option<bool>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Storage of creator profiles. Rows come back as stored; callers normalize
/// them through [`Profile::from`].
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProfileRow>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<ProfileRow>>;
    async fn followers(&self, profile_id: Uuid) -> AppResult<Vec<ProfileRow>>;
    async fn following(&self, profile_id: Uuid) -> AppResult<Vec<ProfileRow>>;
    /// Newest profiles first
    async fn recent(&self, limit: i64) -> AppResult<Vec<ProfileRow>>;
    /// Apply `changes` and return the stored row, or `None` when no profile
    /// has this id. A taken username is a conflict.
    async fn update(&self, id: Uuid, changes: &ProfileChanges) -> AppResult<Option<ProfileRow>>;
}

/// Fields left out of the body keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub followers_private: Option<bool>,
    #[serde(default)]
    pub following_private: Option<bool>,
}
