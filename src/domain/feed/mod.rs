pub mod error;
pub mod mixer;
pub mod service;

pub use error::FeedServiceError;
pub use mixer::{
    compose, dispatch_impressions, partition, ComposedFeed, FeedEntry, ImpressionRecorder,
    Placed, Placement, DEFAULT_PROMOTION_INTERVAL,
};
pub use service::{FeedService, FeedServiceApi, FeedSettings};

use serde::{Deserialize, Serialize};

use crate::domain::profile::Profile;
use crate::domain::splik::Splik;

/// One entry of the home feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItemResponse {
    #[serde(flatten)]
    pub splik: Splik,
    pub profile: Option<Profile>,
    /// Placed in a promoted slot
    pub is_boosted: bool,
}

/// Response for the explore page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploreResponse {
    pub trending: Vec<FeedItemResponse>,
    pub rising_creators: Vec<Profile>,
}
