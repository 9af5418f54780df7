pub mod service;

pub use service::{Bucket, UploadService, UploadServiceApi, UploadedObject};

use async_trait::async_trait;

use crate::error::AppResult;

/// Blob storage with public URLs
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> AppResult<()>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}
