use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        auth::Session,
        social::{Membership, SocialService, SocialServiceApi, ToggleState},
        splik::Splik,
    },
    error::AppResult,
};

pub struct SocialController {
    social_service: Arc<SocialService>,
}

impl SocialController {
    pub fn new(social_service: Arc<SocialService>) -> Self {
        Self { social_service }
    }

    async fn set(
        &self,
        session: &Session,
        kind: Membership,
        target_id: Uuid,
        active: bool,
    ) -> AppResult<Json<ToggleState>> {
        let state = self
            .social_service
            .set_membership(session, kind, target_id, active)
            .await?;
        Ok(Json(state))
    }

    async fn status(
        &self,
        session: &Session,
        kind: Membership,
        target_id: Uuid,
    ) -> AppResult<Json<ToggleState>> {
        let state = self.social_service.status(session, kind, target_id).await?;
        Ok(Json(state))
    }

    /// GET /api/spliks/:id/like
    pub async fn like_status(
        State(controller): State<Arc<SocialController>>,
        Extension(session): Extension<Session>,
        Path(splik_id): Path<Uuid>,
    ) -> AppResult<Json<ToggleState>> {
        controller.status(&session, Membership::Like, splik_id).await
    }

    /// PUT /api/spliks/:id/like
    pub async fn like(
        State(controller): State<Arc<SocialController>>,
        Extension(session): Extension<Session>,
        Path(splik_id): Path<Uuid>,
    ) -> AppResult<Json<ToggleState>> {
        controller.set(&session, Membership::Like, splik_id, true).await
    }

    /// DELETE /api/spliks/:id/like
    pub async fn unlike(
        State(controller): State<Arc<SocialController>>,
        Extension(session): Extension<Session>,
        Path(splik_id): Path<Uuid>,
    ) -> AppResult<Json<ToggleState>> {
        controller.set(&session, Membership::Like, splik_id, false).await
    }

    /// GET /api/spliks/:id/favorite
    pub async fn favorite_status(
        State(controller): State<Arc<SocialController>>,
        Extension(session): Extension<Session>,
        Path(splik_id): Path<Uuid>,
    ) -> AppResult<Json<ToggleState>> {
        controller
            .status(&session, Membership::Favorite, splik_id)
            .await
    }

    /// PUT /api/spliks/:id/favorite
    pub async fn favorite(
        State(controller): State<Arc<SocialController>>,
        Extension(session): Extension<Session>,
        Path(splik_id): Path<Uuid>,
    ) -> AppResult<Json<ToggleState>> {
        controller
            .set(&session, Membership::Favorite, splik_id, true)
            .await
    }

    /// DELETE /api/spliks/:id/favorite
    pub async fn unfavorite(
        State(controller): State<Arc<SocialController>>,
        Extension(session): Extension<Session>,
        Path(splik_id): Path<Uuid>,
    ) -> AppResult<Json<ToggleState>> {
        controller
            .set(&session, Membership::Favorite, splik_id, false)
            .await
    }

    /// GET /api/profiles/:id/follow
    pub async fn follow_status(
        State(controller): State<Arc<SocialController>>,
        Extension(session): Extension<Session>,
        Path(profile_id): Path<Uuid>,
    ) -> AppResult<Json<ToggleState>> {
        controller
            .status(&session, Membership::Follow, profile_id)
            .await
    }

    /// PUT /api/profiles/:id/follow
    pub async fn follow(
        State(controller): State<Arc<SocialController>>,
        Extension(session): Extension<Session>,
        Path(profile_id): Path<Uuid>,
    ) -> AppResult<Json<ToggleState>> {
        controller
            .set(&session, Membership::Follow, profile_id, true)
            .await
    }

    /// DELETE /api/profiles/:id/follow
    pub async fn unfollow(
        State(controller): State<Arc<SocialController>>,
        Extension(session): Extension<Session>,
        Path(profile_id): Path<Uuid>,
    ) -> AppResult<Json<ToggleState>> {
        controller
            .set(&session, Membership::Follow, profile_id, false)
            .await
    }

    /// GET /api/me/favorites
    pub async fn favorites(
        State(controller): State<Arc<SocialController>>,
        Extension(session): Extension<Session>,
    ) -> AppResult<Json<Vec<Splik>>> {
        let spliks = controller.social_service.favorites(&session).await?;
        Ok(Json(spliks))
    }
}
