use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use super::ObjectStorage;
use crate::domain::auth::Session;
use crate::domain::profile::ProfileService;
use crate::domain::splik::service::{MAX_VIDEO_BYTES, VIDEO_MIME_TYPES};
use crate::error::{AppError, AppResult};

const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];
const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Spliks,
    Avatars,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Spliks => "spliks",
            Bucket::Avatars => "avatars",
        }
    }

    pub fn allowed_types(&self) -> &'static [&'static str] {
        match self {
            Bucket::Spliks => VIDEO_MIME_TYPES,
            Bucket::Avatars => IMAGE_MIME_TYPES,
        }
    }

    pub fn max_bytes(&self) -> usize {
        match self {
            Bucket::Spliks => MAX_VIDEO_BYTES as usize,
            Bucket::Avatars => MAX_AVATAR_BYTES,
        }
    }
}

impl FromStr for Bucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spliks" => Ok(Bucket::Spliks),
            "avatars" => Ok(Bucket::Avatars),
            other => Err(AppError::NotFound(format!("Unknown bucket: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedObject {
    pub bucket: String,
    pub path: String,
    pub public_url: String,
    pub size: usize,
}

fn extension(filename: &str, content_type: &str) -> String {
    let from_name = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name.unwrap_or_else(|| {
        match content_type {
            "video/mp4" => "mp4",
            "video/quicktime" => "mov",
            "video/x-flv" => "flv",
            "video/webm" => "webm",
            "video/x-msvideo" => "avi",
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
        .to_string()
    })
}

pub struct UploadService {
    storage: Arc<dyn ObjectStorage>,
    profile_service: Arc<ProfileService>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn ObjectStorage>, profile_service: Arc<ProfileService>) -> Self {
        Self {
            storage,
            profile_service,
        }
    }
}

#[async_trait]
pub trait UploadServiceApi: Send + Sync {
    /// Store a file under `{user_id}/{millis}.{ext}` in the bucket.
    /// An avatar becomes the uploader's profile picture right away.
    async fn upload(
        &self,
        session: &Session,
        bucket: Bucket,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> AppResult<UploadedObject>;
}

#[async_trait]
impl UploadServiceApi for UploadService {
    async fn upload(
        &self,
        session: &Session,
        bucket: Bucket,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> AppResult<UploadedObject> {
        let user = session.require_user("upload files")?;

        if !bucket.allowed_types().contains(&content_type) {
            return Err(AppError::BadRequest(format!(
                "Unsupported file type for {}: {}",
                bucket.as_str(),
                content_type
            )));
        }
        if bytes.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }
        if bytes.len() > bucket.max_bytes() {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the {} MB limit",
                bucket.max_bytes() / (1024 * 1024)
            )));
        }

        let path = format!(
            "{}/{}.{}",
            user.user_id,
            Utc::now().timestamp_millis(),
            extension(filename, content_type)
        );
        let size = bytes.len();
        self.storage
            .upload(bucket.as_str(), &path, content_type, bytes)
            .await?;

        tracing::info!(bucket = bucket.as_str(), path = %path, size, "File uploaded");

        let public_url = self.storage.public_url(bucket.as_str(), &path);
        if bucket == Bucket::Avatars
            && self
                .profile_service
                .set_avatar(user.user_id, &public_url)
                .await?
                .is_none()
        {
            tracing::warn!(user_id = %user.user_id, "Avatar stored for a user without a profile");
        }

        Ok(UploadedObject {
            bucket: bucket.as_str().to_string(),
            public_url,
            path,
            size,
        })
    }
}
