//! Interleaving of promoted (boosted) items into the organic feed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::splik::Splik;
use crate::error::AppResult;

/// One promoted item after every three organic ones
pub const DEFAULT_PROMOTION_INTERVAL: NonZeroUsize = match NonZeroUsize::new(3) {
    Some(interval) => interval,
    None => panic!("promotion interval must be positive"),
};

/// Anything that can be placed in a feed
pub trait FeedEntry {
    fn entry_id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    /// 0 means organic
    fn boost_score(&self) -> i32;

    fn is_promoted(&self) -> bool {
        self.boost_score() > 0
    }
}

impl FeedEntry for Splik {
    fn entry_id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn boost_score(&self) -> i32 {
        self.boost_score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Organic,
    Promoted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placed<T> {
    pub item: T,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedFeed<T> {
    pub items: Vec<Placed<T>>,
}

impl<T> ComposedFeed<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Placed<T>> {
        self.items
    }
}

impl<T: FeedEntry> ComposedFeed<T> {
    /// Ids of the promoted items that made it into the feed, in feed order
    pub fn promoted_ids(&self) -> Vec<Uuid> {
        self.items
            .iter()
            .filter(|placed| placed.placement == Placement::Promoted)
            .map(|placed| placed.item.entry_id())
            .collect()
    }
}

/// Split a mixed list into organic items (newest first) and promoted items
/// (highest score first). Ties keep their input order.
pub fn partition<T: FeedEntry>(items: Vec<T>) -> (Vec<T>, Vec<T>) {
    let (mut promoted, mut organic): (Vec<T>, Vec<T>) =
        items.into_iter().partition(|item| item.is_promoted());

    organic.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    promoted.sort_by(|a, b| b.boost_score().cmp(&a.boost_score()));

    (organic, promoted)
}

/// Insert one promoted item after every `interval` organic items.
///
/// Promoted items are consumed in input order and each is used at most once.
/// Nothing is placed without organic padding: an empty organic list yields
/// an empty feed even when promoted items are available.
pub fn compose<T>(organic: Vec<T>, promoted: Vec<T>, interval: NonZeroUsize) -> ComposedFeed<T> {
    let mut items = Vec::with_capacity(organic.len() + promoted.len());
    let mut promoted = promoted.into_iter();

    for (index, item) in organic.into_iter().enumerate() {
        items.push(Placed {
            item,
            placement: Placement::Organic,
        });

        if (index + 1) % interval.get() == 0 {
            if let Some(boosted) = promoted.next() {
                items.push(Placed {
                    item: boosted,
                    placement: Placement::Promoted,
                });
            }
        }
    }

    ComposedFeed { items }
}

/// Sink for "a promoted item was shown" events
#[async_trait]
pub trait ImpressionRecorder: Send + Sync {
    async fn record_impression(&self, splik_id: Uuid) -> AppResult<()>;
}

/// Fire one impression per placed promoted item without waiting for any of them.
///
/// Failures are logged and dropped. The handles are returned for callers that
/// want to observe completion; dropping them does not cancel the tasks.
pub fn dispatch_impressions(
    recorder: Arc<dyn ImpressionRecorder>,
    splik_ids: Vec<Uuid>,
) -> Vec<JoinHandle<()>> {
    splik_ids
        .into_iter()
        .map(|splik_id| {
            let recorder = recorder.clone();
            tokio::spawn(async move {
                match recorder.record_impression(splik_id).await {
                    Ok(()) => tracing::debug!(splik_id = %splik_id, "Impression recorded"),
                    Err(e) => tracing::warn!(
                        splik_id = %splik_id,
                        error = %e,
                        "Failed to record impression"
                    ),
                }
            })
        })
        .collect()
}
