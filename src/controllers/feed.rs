use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::{
        auth::Session,
        feed::{ExploreResponse, FeedItemResponse, FeedService, FeedServiceApi},
    },
    error::AppResult,
};

pub struct FeedController {
    feed_service: Arc<FeedService>,
}

impl FeedController {
    pub fn new(feed_service: Arc<FeedService>) -> Self {
        Self { feed_service }
    }

    /// GET /api/feed - Home feed with promoted spliks mixed in
    pub async fn home_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(session): Extension<Session>,
    ) -> AppResult<Json<Vec<FeedItemResponse>>> {
        let items = controller.feed_service.home_feed(&session).await?;
        Ok(Json(items))
    }

    /// GET /api/explore - Latest spliks and rising creators
    pub async fn explore(
        State(controller): State<Arc<FeedController>>,
    ) -> AppResult<Json<ExploreResponse>> {
        let explore = controller.feed_service.explore().await?;
        Ok(Json(explore))
    }
}
