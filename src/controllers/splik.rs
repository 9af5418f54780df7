use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        auth::Session,
        splik::{
            CommentResponse, CreateCommentRequest, CreateSplikRequest, RecordViewRequest,
            SplikResponse, SplikService, SplikServiceApi, ViewOutcome,
        },
    },
    error::AppResult,
};

/// First hop of `x-forwarded-for`, else `x-real-ip`
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

pub struct SplikController {
    splik_service: Arc<SplikService>,
}

impl SplikController {
    pub fn new(splik_service: Arc<SplikService>) -> Self {
        Self { splik_service }
    }

    /// POST /api/spliks - Publish an uploaded video as a splik
    pub async fn create(
        State(controller): State<Arc<SplikController>>,
        Extension(session): Extension<Session>,
        Json(request): Json<CreateSplikRequest>,
    ) -> AppResult<(StatusCode, Json<SplikResponse>)> {
        let splik = controller.splik_service.create(&session, request).await?;
        Ok((StatusCode::CREATED, Json(splik)))
    }

    /// GET /api/spliks/:id
    pub async fn get(
        State(controller): State<Arc<SplikController>>,
        Path(splik_id): Path<Uuid>,
    ) -> AppResult<Json<SplikResponse>> {
        let splik = controller.splik_service.get(splik_id).await?;
        Ok(Json(splik))
    }

    /// GET /api/creators/:id/spliks
    pub async fn by_creator(
        State(controller): State<Arc<SplikController>>,
        Path(user_id): Path<Uuid>,
    ) -> AppResult<Json<Vec<SplikResponse>>> {
        let spliks = controller.splik_service.by_creator(user_id).await?;
        Ok(Json(spliks))
    }

    /// POST /api/spliks/:id/views - Count a view once per viewing session
    pub async fn record_view(
        State(controller): State<Arc<SplikController>>,
        Extension(session): Extension<Session>,
        Path(splik_id): Path<Uuid>,
        headers: HeaderMap,
        Json(request): Json<RecordViewRequest>,
    ) -> AppResult<Json<ViewOutcome>> {
        let outcome = controller
            .splik_service
            .record_view(&session, splik_id, &request.session_id, client_ip(&headers))
            .await?;
        Ok(Json(outcome))
    }

    /// GET /api/spliks/:id/comments
    pub async fn list_comments(
        State(controller): State<Arc<SplikController>>,
        Path(splik_id): Path<Uuid>,
    ) -> AppResult<Json<Vec<CommentResponse>>> {
        let comments = controller.splik_service.list_comments(splik_id).await?;
        Ok(Json(comments))
    }

    /// POST /api/spliks/:id/comments
    pub async fn add_comment(
        State(controller): State<Arc<SplikController>>,
        Extension(session): Extension<Session>,
        Path(splik_id): Path<Uuid>,
        Json(request): Json<CreateCommentRequest>,
    ) -> AppResult<(StatusCode, Json<CommentResponse>)> {
        let comment = controller
            .splik_service
            .add_comment(&session, splik_id, &request.content)
            .await?;
        Ok((StatusCode::CREATED, Json(comment)))
    }

    /// DELETE /api/spliks/:id/comments/:comment_id - Splik owner only
    pub async fn delete_comment(
        State(controller): State<Arc<SplikController>>,
        Extension(session): Extension<Session>,
        Path((splik_id, comment_id)): Path<(Uuid, Uuid)>,
    ) -> AppResult<StatusCode> {
        controller
            .splik_service
            .delete_comment(&session, splik_id, comment_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
