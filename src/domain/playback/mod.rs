//! Trim-window selection and looping playback of the selected clip.

pub mod controller;
pub mod error;
pub mod window;

pub use controller::{MediaElement, PlayOutcome, PlaybackController, PlaybackState, Resume};
pub use error::{PlaybackError, PlaybackRejected};
pub use window::{Handle, TrimRange, TrimWindow, WindowSpec, DEFAULT_STEP_SECS, WINDOW_LENGTH_SECS};
