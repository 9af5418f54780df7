use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::auth::Session,
    domain::profile::{Profile, ProfileService, ProfileServiceApi, UpdateProfileRequest},
    error::AppResult,
};

pub struct ProfileController {
    profile_service: Arc<ProfileService>,
}

impl ProfileController {
    pub fn new(profile_service: Arc<ProfileService>) -> Self {
        Self { profile_service }
    }

    /// GET /api/profiles/:id
    pub async fn get(
        State(controller): State<Arc<ProfileController>>,
        Path(profile_id): Path<Uuid>,
    ) -> AppResult<Json<Profile>> {
        let profile = controller.profile_service.get(profile_id).await?;
        Ok(Json(profile))
    }

    /// GET /api/profiles/:id/followers
    pub async fn followers(
        State(controller): State<Arc<ProfileController>>,
        Extension(session): Extension<Session>,
        Path(profile_id): Path<Uuid>,
    ) -> AppResult<Json<Vec<Profile>>> {
        let followers = controller
            .profile_service
            .followers(&session, profile_id)
            .await?;
        Ok(Json(followers))
    }

    /// GET /api/profiles/:id/following
    pub async fn following(
        State(controller): State<Arc<ProfileController>>,
        Extension(session): Extension<Session>,
        Path(profile_id): Path<Uuid>,
    ) -> AppResult<Json<Vec<Profile>>> {
        let following = controller
            .profile_service
            .following(&session, profile_id)
            .await?;
        Ok(Json(following))
    }

    /// PATCH /api/me/profile
    pub async fn update_me(
        State(controller): State<Arc<ProfileController>>,
        Extension(session): Extension<Session>,
        Json(request): Json<UpdateProfileRequest>,
    ) -> AppResult<Json<Profile>> {
        let profile = controller
            .profile_service
            .update_profile(&session, request)
            .await?;
        Ok(Json(profile))
    }
}
