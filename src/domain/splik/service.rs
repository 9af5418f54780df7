use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::error::SplikServiceError;
use super::{
    CommentRepository, CommentResponse, CreateSplikRequest, NewSplik, SplikRepository,
    SplikResponse, ViewOutcome, ViewRecord,
};
use crate::domain::auth::Session;
use crate::domain::playback::{TrimRange, WindowSpec};
use crate::domain::profile::{ProfileService, ProfileServiceApi};
use crate::domain::realtime::{RealtimeEvent, RealtimeHub};

pub const VIDEO_MIME_TYPES: &[&str] = &[
    "video/mp4",
    "video/quicktime",
    "video/x-flv",
    "video/webm",
    "video/x-msvideo",
];
pub const MAX_VIDEO_BYTES: i64 = 500 * 1024 * 1024;
pub const MAX_COMMENT_CHARS: usize = 500;
const MAX_SESSION_ID_LEN: usize = 128;

pub struct SplikService {
    splik_repo: Arc<dyn SplikRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    profile_service: Arc<ProfileService>,
    hub: Arc<RealtimeHub>,
    window: WindowSpec,
}

impl SplikService {
    pub fn new(
        splik_repo: Arc<dyn SplikRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        profile_service: Arc<ProfileService>,
        hub: Arc<RealtimeHub>,
    ) -> Self {
        Self {
            splik_repo,
            comment_repo,
            profile_service,
            hub,
            window: WindowSpec::default(),
        }
    }

    fn validate_upload(request: &CreateSplikRequest) -> Result<(), SplikServiceError> {
        if request.title.trim().is_empty() {
            return Err(SplikServiceError::Invalid("Title is required".to_string()));
        }
        if request.video_url.trim().is_empty() {
            return Err(SplikServiceError::Invalid("Video URL is required".to_string()));
        }
        if !VIDEO_MIME_TYPES.contains(&request.mime_type.as_str()) {
            return Err(SplikServiceError::Invalid(format!(
                "Unsupported video type: {}",
                request.mime_type
            )));
        }
        if request.file_size <= 0 {
            return Err(SplikServiceError::Invalid("File is empty".to_string()));
        }
        if request.file_size > MAX_VIDEO_BYTES {
            return Err(SplikServiceError::TooLarge(
                "Video must be 500MB or smaller".to_string(),
            ));
        }
        Ok(())
    }

    /// Push the splik's current counters to anyone watching it
    async fn publish_counters(&self, splik_id: Uuid) {
        match self.splik_repo.find_by_id(splik_id).await {
            Ok(Some(splik)) => {
                let reached = self.hub.publish(RealtimeEvent::SplikUpdated {
                    splik_id,
                    views: splik.views,
                    likes_count: splik.likes_count,
                    comments_count: splik.comments_count,
                });
                tracing::trace!(splik_id = %splik_id, reached, "Published splik counters");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(splik_id = %splik_id, error = %e, "Failed to load counters for publish")
            }
        }
    }
}

#[async_trait]
pub trait SplikServiceApi: Send + Sync {
    /// Store a new splik. The trim pair is checked against the source and
    /// the saved clip is capped at one window.
    async fn create(
        &self,
        session: &Session,
        request: CreateSplikRequest,
    ) -> Result<SplikResponse, SplikServiceError>;

    async fn get(&self, id: Uuid) -> Result<SplikResponse, SplikServiceError>;

    async fn by_creator(&self, user_id: Uuid) -> Result<Vec<SplikResponse>, SplikServiceError>;

    async fn record_view(
        &self,
        session: &Session,
        splik_id: Uuid,
        session_id: &str,
        ip_address: Option<String>,
    ) -> Result<ViewOutcome, SplikServiceError>;

    async fn list_comments(
        &self,
        splik_id: Uuid,
    ) -> Result<Vec<CommentResponse>, SplikServiceError>;

    async fn add_comment(
        &self,
        session: &Session,
        splik_id: Uuid,
        content: &str,
    ) -> Result<CommentResponse, SplikServiceError>;

    /// Only the owner of the splik may remove its comments
    async fn delete_comment(
        &self,
        session: &Session,
        splik_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), SplikServiceError>;
}

#[async_trait]
impl SplikServiceApi for SplikService {
    async fn create(
        &self,
        session: &Session,
        request: CreateSplikRequest,
    ) -> Result<SplikResponse, SplikServiceError> {
        let user = session.require_user("upload spliks")?;
        Self::validate_upload(&request)?;

        let clip = TrimRange::for_upload(
            request.source_duration,
            request.trim_start,
            request.trim_end,
            self.window,
        )
        .map_err(|e| SplikServiceError::Invalid(e.to_string()))?;

        let was_trimmed = clip.start_ms() > 0 || clip.end() < request.source_duration;
        let description = match request.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ if was_trimmed => format!("Trimmed: {:.1}s - {:.1}s", clip.start(), clip.end()),
            _ => String::new(),
        };

        let splik = self
            .splik_repo
            .create(NewSplik {
                user_id: user.user_id,
                title: request.title.trim().to_string(),
                description,
                video_url: request.video_url,
                thumbnail_url: request.thumbnail_url,
                duration: clip.length(),
                file_size: request.file_size,
                mime_type: request.mime_type,
                trim_start: clip.start(),
                trim_end: clip.end(),
            })
            .await?;

        tracing::info!(
            splik_id = %splik.id,
            user_id = %user.user_id,
            trim_start = clip.start(),
            trim_end = clip.end(),
            "Splik created"
        );

        // The creator's spliks_count just changed
        self.profile_service.invalidate(user.user_id).await;
        let profile = self.profile_service.find(user.user_id).await?;
        Ok(SplikResponse { splik, profile })
    }

    async fn get(&self, id: Uuid) -> Result<SplikResponse, SplikServiceError> {
        let splik = self
            .splik_repo
            .find_by_id(id)
            .await?
            .ok_or(SplikServiceError::NotFound)?;
        let profile = self.profile_service.find(splik.user_id).await?;
        Ok(SplikResponse { splik, profile })
    }

    async fn by_creator(&self, user_id: Uuid) -> Result<Vec<SplikResponse>, SplikServiceError> {
        let profile = self.profile_service.find(user_id).await?;
        let spliks = self.splik_repo.find_by_user(user_id).await?;
        Ok(spliks
            .into_iter()
            .map(|splik| SplikResponse {
                splik,
                profile: profile.clone(),
            })
            .collect())
    }

    async fn record_view(
        &self,
        session: &Session,
        splik_id: Uuid,
        session_id: &str,
        ip_address: Option<String>,
    ) -> Result<ViewOutcome, SplikServiceError> {
        let session_id = session_id.trim();
        if session_id.is_empty() || session_id.len() > MAX_SESSION_ID_LEN {
            return Err(SplikServiceError::Invalid(
                "A valid session id is required".to_string(),
            ));
        }
        if self.splik_repo.find_by_id(splik_id).await?.is_none() {
            return Err(SplikServiceError::NotFound);
        }

        let outcome = self
            .splik_repo
            .record_view(ViewRecord {
                splik_id,
                session_id: session_id.to_string(),
                viewer_id: session.user_id(),
                ip_address,
            })
            .await?;

        if outcome.new_view {
            self.publish_counters(splik_id).await;
        }
        Ok(outcome)
    }

    async fn list_comments(
        &self,
        splik_id: Uuid,
    ) -> Result<Vec<CommentResponse>, SplikServiceError> {
        let comments = self.comment_repo.list(splik_id).await?;
        let author_ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
        let authors = self.profile_service.get_many(&author_ids).await?;

        Ok(comments
            .into_iter()
            .map(|comment| {
                let profile = authors.get(&comment.user_id).cloned();
                CommentResponse { comment, profile }
            })
            .collect())
    }

    async fn add_comment(
        &self,
        session: &Session,
        splik_id: Uuid,
        content: &str,
    ) -> Result<CommentResponse, SplikServiceError> {
        let user = session.require_user("comment")?;

        let content = content.trim();
        if content.is_empty() {
            return Err(SplikServiceError::Invalid("Comment cannot be empty".to_string()));
        }
        if content.chars().count() > MAX_COMMENT_CHARS {
            return Err(SplikServiceError::Invalid(format!(
                "Comment must be {} characters or fewer",
                MAX_COMMENT_CHARS
            )));
        }
        if self.splik_repo.find_by_id(splik_id).await?.is_none() {
            return Err(SplikServiceError::NotFound);
        }

        let comment = self
            .comment_repo
            .create(splik_id, user.user_id, content)
            .await?;
        self.publish_counters(splik_id).await;

        let profile = self.profile_service.find(user.user_id).await?;
        Ok(CommentResponse { comment, profile })
    }

    async fn delete_comment(
        &self,
        session: &Session,
        splik_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), SplikServiceError> {
        let user = session.require_user("delete comments")?;

        let splik = self
            .splik_repo
            .find_by_id(splik_id)
            .await?
            .ok_or(SplikServiceError::NotFound)?;
        if splik.user_id != user.user_id {
            return Err(SplikServiceError::Forbidden(
                "Only the splik's creator can delete its comments".to_string(),
            ));
        }

        let comment = self
            .comment_repo
            .find(comment_id)
            .await?
            .filter(|c| c.splik_id == splik_id)
            .ok_or(SplikServiceError::CommentNotFound)?;

        if !self.comment_repo.delete(comment.id).await? {
            return Err(SplikServiceError::CommentNotFound);
        }
        tracing::info!(splik_id = %splik_id, comment_id = %comment.id, "Comment deleted");

        self.publish_counters(splik_id).await;
        Ok(())
    }
}
