pub mod error;
pub mod model;
pub mod service;

pub use error::SplikServiceError;
pub use model::{Comment, NewSplik, Splik, ViewOutcome, ViewRecord};
pub use service::{SplikService, SplikServiceApi};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::profile::Profile;
use crate::error::AppResult;

#[async_trait]
pub trait SplikRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Splik>>;
    /// Unboosted spliks, newest first
    async fn find_organic(&self, limit: i64) -> AppResult<Vec<Splik>>;
    /// Spliks with a boost that is still running at `now`, highest score first
    async fn find_promoted(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<Splik>>;
    /// All spliks, newest first
    async fn find_recent(&self, limit: i64) -> AppResult<Vec<Splik>>;
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Splik>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Splik>>;
    async fn create(&self, splik: NewSplik) -> AppResult<Splik>;
    /// Count the view unless this session already viewed the splik
    async fn record_view(&self, view: ViewRecord) -> AppResult<ViewOutcome>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Newest first
    async fn list(&self, splik_id: Uuid) -> AppResult<Vec<Comment>>;
    /// Store the comment and bump the splik's comment counter
    async fn create(&self, splik_id: Uuid, user_id: Uuid, content: &str) -> AppResult<Comment>;
    async fn find(&self, comment_id: Uuid) -> AppResult<Option<Comment>>;
    /// Remove the comment and lower the splik's comment counter.
    /// Returns whether a comment was removed.
    async fn delete(&self, comment_id: Uuid) -> AppResult<bool>;
}

/// Metadata for an uploaded source video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSplikRequest {
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub mime_type: String,
    pub file_size: i64,
    /// Length of the uploaded source in seconds
    pub source_duration: f64,
    pub trim_start: f64,
    pub trim_end: f64,
}

/// A splik with its creator attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplikResponse {
    #[serde(flatten)]
    pub splik: Splik,
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordViewRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    #[serde(flatten)]
    pub comment: Comment,
    pub profile: Option<Profile>,
}
