use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Splik(Uuid),
    Profile(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeEvent {
    SplikUpdated {
        splik_id: Uuid,
        views: i64,
        likes_count: i64,
        comments_count: i64,
    },
    FollowersChanged {
        profile_id: Uuid,
        followers_count: i64,
    },
}

impl RealtimeEvent {
    pub fn topic(&self) -> Topic {
        match self {
            RealtimeEvent::SplikUpdated { splik_id, .. } => Topic::Splik(*splik_id),
            RealtimeEvent::FollowersChanged { profile_id, .. } => Topic::Profile(*profile_id),
        }
    }
}

struct Channel {
    sender: broadcast::Sender<RealtimeEvent>,
    subscribers: usize,
}

/// Per-topic fan-out of counter updates to open views
#[derive(Default)]
pub struct RealtimeHub {
    channels: Mutex<HashMap<Topic, Channel>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a subscription; the topic lives as long as any handle does
    pub fn subscribe(self: &Arc<Self>, topic: Topic) -> Subscription {
        let mut channels = self.channels.lock();
        let channel = channels.entry(topic).or_insert_with(|| Channel {
            sender: broadcast::channel(CHANNEL_CAPACITY).0,
            subscribers: 0,
        });
        channel.subscribers += 1;
        let receiver = channel.sender.subscribe();
        tracing::debug!(?topic, subscribers = channel.subscribers, "Subscribed");

        Subscription {
            hub: Arc::clone(self),
            topic,
            receiver,
        }
    }

    /// Returns how many subscribers the event reached. Events on a topic
    /// nobody watches are dropped.
    pub fn publish(&self, event: RealtimeEvent) -> usize {
        let topic = event.topic();
        let channels = self.channels.lock();
        match channels.get(&topic) {
            Some(channel) => channel.sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    pub fn active_topics(&self) -> usize {
        self.channels.lock().len()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels
            .lock()
            .get(&topic)
            .map(|c| c.subscribers)
            .unwrap_or(0)
    }

    fn release(&self, topic: Topic) {
        let mut channels = self.channels.lock();
        if let Some(channel) = channels.get_mut(&topic) {
            channel.subscribers = channel.subscribers.saturating_sub(1);
            if channel.subscribers == 0 {
                channels.remove(&topic);
                tracing::debug!(?topic, "Last subscriber left, topic closed");
            }
        }
    }
}

/// Handle for one open view's subscription. Dropping it unsubscribes.
pub struct Subscription {
    hub: Arc<RealtimeHub>,
    topic: Topic,
    receiver: broadcast::Receiver<RealtimeEvent>,
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Next event for this topic. A subscriber that fell behind jumps to the
    /// newest buffered event; only the latest counters matter.
    pub async fn next(&mut self) -> Option<RealtimeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(topic = ?self.topic, skipped, "Subscriber lagged");
                    if let Some(latest) = self.drain_buffered() {
                        return Some(latest);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Empty the receive buffer and keep only its last event
    fn drain_buffered(&mut self) -> Option<RealtimeEvent> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => latest = Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => return latest,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.release(self.topic);
    }
}

/// Client-side view of a splik's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterView {
    pub views: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub followers_count: i64,
}

impl CounterView {
    /// Latest message wins; no merging
    pub fn apply(&mut self, event: &RealtimeEvent) {
        match *event {
            RealtimeEvent::SplikUpdated {
                views,
                likes_count,
                comments_count,
                ..
            } => {
                self.views = views;
                self.likes_count = likes_count;
                self.comments_count = comments_count;
            }
            RealtimeEvent::FollowersChanged {
                followers_count, ..
            } => {
                self.followers_count = followers_count;
            }
        }
    }
}
