use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::realtime::{RealtimeHub, Subscription, Topic};

pub struct RealtimeController {
    hub: Arc<RealtimeHub>,
}

impl RealtimeController {
    pub fn new(hub: Arc<RealtimeHub>) -> Self {
        Self { hub }
    }

    /// The subscription lives inside the stream, so it is released when the
    /// client disconnects and axum drops the response body.
    fn events(subscription: Subscription) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        let stream = stream::unfold(subscription, |mut subscription| async move {
            let event = subscription.next().await?;
            let sse = Event::default().json_data(&event).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to encode realtime event");
                Event::default().comment("encode error")
            });
            Some((Ok(sse), subscription))
        });

        Sse::new(stream).keep_alive(KeepAlive::default())
    }

    /// GET /api/realtime/spliks/:id - Counter updates for one splik
    pub async fn splik_events(
        State(controller): State<Arc<RealtimeController>>,
        Path(splik_id): Path<Uuid>,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        Self::events(controller.hub.subscribe(Topic::Splik(splik_id)))
    }

    /// GET /api/realtime/profiles/:id - Follower count updates for one profile
    pub async fn profile_events(
        State(controller): State<Arc<RealtimeController>>,
        Path(profile_id): Path<Uuid>,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        Self::events(controller.hub.subscribe(Topic::Profile(profile_id)))
    }
}
