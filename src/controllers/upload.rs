use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    domain::{
        auth::Session,
        storage::{Bucket, UploadService, UploadServiceApi, UploadedObject},
    },
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

pub struct UploadController {
    upload_service: Arc<UploadService>,
}

impl UploadController {
    pub fn new(upload_service: Arc<UploadService>) -> Self {
        Self { upload_service }
    }

    /// POST /api/uploads/:bucket?filename= - Raw file body
    pub async fn upload(
        State(controller): State<Arc<UploadController>>,
        Extension(session): Extension<Session>,
        Path(bucket): Path<String>,
        Query(query): Query<UploadQuery>,
        headers: HeaderMap,
        body: Bytes,
    ) -> AppResult<(StatusCode, Json<UploadedObject>)> {
        let bucket: Bucket = bucket.parse()?;
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_ascii_lowercase())
            .ok_or_else(|| AppError::BadRequest("Content-Type header is required".to_string()))?;

        let uploaded = controller
            .upload_service
            .upload(
                &session,
                bucket,
                query.filename.as_deref().unwrap_or_default(),
                &content_type,
                body.to_vec(),
            )
            .await?;
        Ok((StatusCode::CREATED, Json(uploaded)))
    }
}
