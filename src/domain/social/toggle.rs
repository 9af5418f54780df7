//! Optimistic toggling of a membership fact (liked, favorited, following).
//!
//! The displayed state flips before the mutation is sent and is restored from
//! a snapshot if the mutation fails. Presses are not coalesced: every toggle
//! issues its own mutation and whichever response settles last decides what
//! is displayed.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToggleState {
    pub active: bool,
    pub count: i64,
}

impl ToggleState {
    pub fn new(active: bool, count: i64) -> Self {
        Self { active, count }
    }

    /// The state shown right after a press
    pub fn flipped(self) -> Self {
        let count = if self.active {
            (self.count - 1).max(0)
        } else {
            self.count + 1
        };
        Self {
            active: !self.active,
            count,
        }
    }
}

/// A failed mutation, with the snapshot that was put back
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("toggle rolled back: {error}")]
pub struct ToggleRollback<E: std::fmt::Display> {
    pub restored: ToggleState,
    pub error: E,
}

/// Flip the displayed state, run `mutate` with the new `active` value and
/// roll back to the pre-toggle snapshot when it fails.
pub async fn optimistic_toggle<G, S, M, Fut, E>(
    get: G,
    set: S,
    mutate: M,
) -> Result<ToggleState, ToggleRollback<E>>
where
    G: Fn() -> ToggleState,
    S: Fn(ToggleState),
    M: FnOnce(bool) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let snapshot = get();
    let optimistic = snapshot.flipped();
    set(optimistic);

    match mutate(optimistic.active).await {
        Ok(()) => Ok(optimistic),
        Err(error) => {
            set(snapshot);
            Err(ToggleRollback {
                restored: snapshot,
                error,
            })
        }
    }
}

/// Where user-visible errors go
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Notifier that only logs
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(message = %message, "Toggle failed");
    }
}

/// Shared toggle state for one control (e.g. the like button on one splik)
#[derive(Clone)]
pub struct ToggleControl {
    state: Arc<Mutex<ToggleState>>,
    notifier: Arc<dyn Notifier>,
    failure_message: String,
}

impl ToggleControl {
    pub fn new(
        initial: ToggleState,
        notifier: Arc<dyn Notifier>,
        failure_message: impl Into<String>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
            notifier,
            failure_message: failure_message.into(),
        }
    }

    pub fn current(&self) -> ToggleState {
        *self.state.lock()
    }

    /// Apply an authoritative update pushed from elsewhere
    pub fn overwrite(&self, state: ToggleState) {
        *self.state.lock() = state;
    }

    pub async fn toggle<M, Fut, E>(&self, mutate: M) -> Result<ToggleState, ToggleRollback<E>>
    where
        M: FnOnce(bool) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: std::fmt::Display,
    {
        let result = optimistic_toggle(
            || self.current(),
            |state| self.overwrite(state),
            mutate,
        )
        .await;

        if let Err(rollback) = &result {
            tracing::debug!(error = %rollback.error, "Rolling back optimistic toggle");
            self.notifier.error(&self.failure_message);
        }
        result
    }
}
