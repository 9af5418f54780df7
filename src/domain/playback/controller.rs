use serde::Serialize;

use super::error::{PlaybackError, PlaybackRejected};
use super::window::{Handle, TrimRange, TrimWindow, WindowSpec};

/// The player the controller drives
pub trait MediaElement {
    fn play(&mut self, muted: bool) -> Result<(), PlaybackRejected>;
    fn pause(&mut self);
    fn seek(&mut self, secs: f64);
    fn current_time(&self) -> f64;
}

/// State to return to when a drag ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resume {
    Ready,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "state")]
pub enum PlaybackState {
    Idle,
    Ready,
    Dragging { handle: Handle, resume: Resume },
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayOutcome {
    Playing,
    /// Unmuted playback was refused; playing with audio off
    PlayingMuted,
    /// Both attempts were refused; no further automatic retries
    Blocked,
}

pub struct PlaybackController<M> {
    media: M,
    spec: WindowSpec,
    window: Option<TrimWindow>,
    state: PlaybackState,
    muted: bool,
}

impl<M: MediaElement> PlaybackController<M> {
    pub fn new(media: M, spec: WindowSpec) -> Self {
        Self {
            media,
            spec,
            window: None,
            state: PlaybackState::Idle,
            muted: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn window(&self) -> Option<&TrimWindow> {
        self.window.as_ref()
    }

    pub fn range(&self) -> Option<TrimRange> {
        self.window.as_ref().map(TrimWindow::range)
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    fn invalid(&self, action: &'static str) -> PlaybackError {
        PlaybackError::InvalidTransition {
            state: self.state,
            action,
        }
    }

    /// Metadata for a (new) source arrived
    pub fn load_metadata(&mut self, duration_secs: f64) -> Result<TrimRange, PlaybackError> {
        let window = TrimWindow::new(duration_secs, self.spec)?;
        let range = window.range();

        if self.state == PlaybackState::Playing {
            self.media.pause();
        }
        self.media.seek(range.start());
        self.window = Some(window);
        self.state = PlaybackState::Ready;
        self.muted = false;

        tracing::debug!(duration = duration_secs, "Media metadata loaded");
        Ok(range)
    }

    pub fn pointer_down(&mut self, handle: Handle) -> Result<(), PlaybackError> {
        let resume = match self.state {
            PlaybackState::Ready => Resume::Ready,
            PlaybackState::Paused => Resume::Paused,
            _ => return Err(self.invalid("start dragging")),
        };
        self.state = PlaybackState::Dragging { handle, resume };
        Ok(())
    }

    /// `fraction` is the pointer position along the track, 0.0 to 1.0
    pub fn pointer_move(&mut self, fraction: f64) -> Result<TrimRange, PlaybackError> {
        let PlaybackState::Dragging { handle, .. } = self.state else {
            return Err(self.invalid("drag"));
        };
        let Some(window) = self.window.as_mut() else {
            return Err(self.invalid("drag"));
        };

        let raw = window.position_to_time(fraction);
        Ok(window.drag(handle, raw))
    }

    pub fn pointer_up(&mut self) -> Result<TrimRange, PlaybackError> {
        let PlaybackState::Dragging { resume, .. } = self.state else {
            return Err(self.invalid("stop dragging"));
        };
        let Some(range) = self.range() else {
            return Err(self.invalid("stop dragging"));
        };

        self.media.seek(range.start());
        self.state = match resume {
            Resume::Ready => PlaybackState::Ready,
            Resume::Paused => PlaybackState::Paused,
        };
        Ok(range)
    }

    /// Start looping the selected window.
    ///
    /// A refused unmuted start is retried once muted. If that is refused too
    /// the controller settles in `Paused`.
    pub fn play(&mut self) -> Result<PlayOutcome, PlaybackError> {
        match self.state {
            PlaybackState::Ready | PlaybackState::Paused => {}
            PlaybackState::Playing => {
                return Ok(if self.muted {
                    PlayOutcome::PlayingMuted
                } else {
                    PlayOutcome::Playing
                })
            }
            _ => return Err(self.invalid("play")),
        }
        let Some(range) = self.range() else {
            return Err(self.invalid("play"));
        };

        if !range.contains(self.media.current_time()) {
            self.media.seek(range.start());
        }

        let outcome = match self.media.play(self.muted) {
            Ok(()) if self.muted => PlayOutcome::PlayingMuted,
            Ok(()) => PlayOutcome::Playing,
            Err(first) if !self.muted => {
                tracing::debug!(error = %first, "Unmuted playback refused, retrying muted");
                match self.media.play(true) {
                    Ok(()) => {
                        self.muted = true;
                        PlayOutcome::PlayingMuted
                    }
                    Err(second) => {
                        tracing::debug!(error = %second, "Muted playback refused");
                        PlayOutcome::Blocked
                    }
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Muted playback refused");
                PlayOutcome::Blocked
            }
        };

        self.state = match outcome {
            PlayOutcome::Blocked => PlaybackState::Paused,
            _ => PlaybackState::Playing,
        };
        Ok(outcome)
    }

    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        match self.state {
            PlaybackState::Playing => {
                self.media.pause();
                self.state = PlaybackState::Paused;
                Ok(())
            }
            PlaybackState::Paused => Ok(()),
            _ => Err(self.invalid("pause")),
        }
    }

    /// Time update from the runtime. Returns the time to display.
    pub fn tick(&mut self) -> f64 {
        let current = self.media.current_time();
        if self.state != PlaybackState::Playing {
            return current;
        }
        let Some(range) = self.range() else {
            return current;
        };

        if current >= range.end() || current < range.start() {
            self.media.seek(range.start());
            return range.start();
        }
        current
    }

    /// Seek within the selected window
    pub fn seek(&mut self, secs: f64) -> Result<f64, PlaybackError> {
        let Some(range) = self.range() else {
            return Err(self.invalid("seek"));
        };
        let target = if secs.is_finite() {
            secs.clamp(range.start(), range.end())
        } else {
            range.start()
        };
        self.media.seek(target);
        Ok(target)
    }

    /// The clip that would be saved right now
    pub fn finalize(&self) -> Option<TrimRange> {
        self.window.as_ref().map(TrimWindow::finalize)
    }

    /// Unload the source
    pub fn reset(&mut self) {
        if self.state == PlaybackState::Playing {
            self.media.pause();
        }
        self.window = None;
        self.state = PlaybackState::Idle;
        self.muted = false;
    }
}
