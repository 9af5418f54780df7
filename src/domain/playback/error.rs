use crate::error::AppError;

use super::controller::PlaybackState;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    #[error("invalid window: {0}")]
    InvalidSpec(String),
    #[error("invalid source duration: {0}")]
    InvalidDuration(f64),
    #[error("invalid trim range: start {start}s, end {end}s")]
    InvalidRange { start: f64, end: f64 },
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        state: PlaybackState,
        action: &'static str,
    },
}

impl From<PlaybackError> for AppError {
    fn from(err: PlaybackError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Raised by the media runtime when it refuses to start playback
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("playback rejected: {0}")]
pub struct PlaybackRejected(pub String);
