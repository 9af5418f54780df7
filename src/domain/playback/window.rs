use serde::{Deserialize, Serialize};

use super::error::PlaybackError;

/// Longest clip a splik may play
pub const WINDOW_LENGTH_SECS: f64 = 3.0;
/// Resolution of the trim handles
pub const DEFAULT_STEP_SECS: f64 = 0.1;

pub(crate) fn to_millis(secs: f64) -> u64 {
    (secs * 1000.0).round().max(0.0) as u64
}

pub(crate) fn to_secs(millis: u64) -> f64 {
    millis as f64 / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Start,
    End,
}

/// Window geometry, held in whole milliseconds so length comparisons are exact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    length_ms: u64,
    step_ms: u64,
}

impl WindowSpec {
    pub fn new(length_secs: f64, step_secs: f64) -> Result<Self, PlaybackError> {
        if !(length_secs.is_finite() && length_secs > 0.0) {
            return Err(PlaybackError::InvalidSpec(format!(
                "window length must be positive, got {}",
                length_secs
            )));
        }
        if !(step_secs.is_finite() && step_secs > 0.0) {
            return Err(PlaybackError::InvalidSpec(format!(
                "step must be positive, got {}",
                step_secs
            )));
        }

        let length_ms = to_millis(length_secs);
        let step_ms = to_millis(step_secs).max(1);
        Ok(Self { length_ms, step_ms })
    }

    pub fn length(&self) -> f64 {
        to_secs(self.length_ms)
    }

    pub fn step(&self) -> f64 {
        to_secs(self.step_ms)
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            length_ms: 3_000,
            step_ms: 100,
        }
    }
}

/// A [start, end] selection on the source timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimRange {
    start_ms: u64,
    end_ms: u64,
}

impl TrimRange {
    pub fn start(&self) -> f64 {
        to_secs(self.start_ms)
    }

    pub fn end(&self) -> f64 {
        to_secs(self.end_ms)
    }

    pub fn length(&self) -> f64 {
        to_secs(self.length_ms())
    }

    pub fn length_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.end_ms
    }

    pub fn contains(&self, secs: f64) -> bool {
        let ms = to_millis(secs);
        secs >= 0.0 && ms >= self.start_ms && ms < self.end_ms
    }

    /// Validate the trim pair sent with an upload and return the clip that
    /// will actually be saved: at most one window long, inside the source.
    pub fn for_upload(
        source_duration: f64,
        start: f64,
        end: f64,
        spec: WindowSpec,
    ) -> Result<Self, PlaybackError> {
        if !(source_duration.is_finite() && source_duration > 0.0) {
            return Err(PlaybackError::InvalidDuration(source_duration));
        }
        if !(start.is_finite() && end.is_finite()) || start < 0.0 {
            return Err(PlaybackError::InvalidRange { start, end });
        }

        let duration_ms = to_millis(source_duration);
        let start_ms = to_millis(start);
        let end_ms = to_millis(end).min(duration_ms);
        if start_ms >= end_ms {
            return Err(PlaybackError::InvalidRange { start, end });
        }

        let mut window = TrimWindow::from_millis(duration_ms, spec);
        window.range = TrimRange { start_ms, end_ms };
        Ok(window.finalize())
    }
}

impl Serialize for TrimRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("TrimRange", 2)?;
        state.serialize_field("start", &self.start())?;
        state.serialize_field("end", &self.end())?;
        state.end()
    }
}

/// Interactive trim selection over a loaded source
#[derive(Debug, Clone, PartialEq)]
pub struct TrimWindow {
    duration_ms: u64,
    spec: WindowSpec,
    range: TrimRange,
}

impl TrimWindow {
    /// Selection starts as the first window of the source, or the whole
    /// source when it is shorter than a window.
    pub fn new(duration_secs: f64, spec: WindowSpec) -> Result<Self, PlaybackError> {
        if !(duration_secs.is_finite() && duration_secs > 0.0) {
            return Err(PlaybackError::InvalidDuration(duration_secs));
        }
        let duration_ms = to_millis(duration_secs).max(1);
        Ok(Self::from_millis(duration_ms, spec))
    }

    fn from_millis(duration_ms: u64, spec: WindowSpec) -> Self {
        Self {
            duration_ms,
            spec,
            range: TrimRange {
                start_ms: 0,
                end_ms: spec.length_ms.min(duration_ms),
            },
        }
    }

    pub fn duration(&self) -> f64 {
        to_secs(self.duration_ms)
    }

    pub fn spec(&self) -> WindowSpec {
        self.spec
    }

    pub fn range(&self) -> TrimRange {
        self.range
    }

    /// Whether the source is long enough to need trimming at all
    pub fn is_trimmable(&self) -> bool {
        self.duration_ms > self.spec.length_ms
    }

    /// Shortest selection the handles can produce
    pub fn min_length_ms(&self) -> u64 {
        self.spec.length_ms.min(self.duration_ms)
    }

    fn snap_ms(&self, raw_secs: f64) -> u64 {
        let raw = if raw_secs.is_finite() { raw_secs } else { 0.0 };
        let clamped = to_millis(raw.clamp(0.0, self.duration()));
        let step = self.spec.step_ms;
        let snapped = ((clamped + step / 2) / step) * step;
        snapped.min(self.duration_ms)
    }

    /// Clamp a raw timeline value into the source and round it to the step
    pub fn snap(&self, raw_secs: f64) -> f64 {
        to_secs(self.snap_ms(raw_secs))
    }

    /// Map a pointer position (fraction of the track width) to a timeline value
    pub fn position_to_time(&self, fraction: f64) -> f64 {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.snap(fraction * self.duration())
    }

    /// Move one handle to `raw_secs`, keeping the selection at least one
    /// window long and never inverted.
    pub fn drag(&mut self, handle: Handle, raw_secs: f64) -> TrimRange {
        let value = self.snap_ms(raw_secs);
        let length = self.spec.length_ms;

        match handle {
            Handle::Start => {
                let max_start = self.range.end_ms.saturating_sub(length);
                self.range.start_ms = value.min(max_start);
            }
            Handle::End => {
                let min_end = self.range.start_ms + length;
                self.range.end_ms = value.max(min_end).min(self.duration_ms);
            }
        }

        self.range
    }

    /// The clip that gets saved: starts at the selection start, at most one window long
    pub fn finalize(&self) -> TrimRange {
        let end_ms = (self.range.start_ms + self.spec.length_ms).min(self.duration_ms);
        TrimRange {
            start_ms: self.range.start_ms,
            end_ms: end_ms.max(self.range.start_ms + 1),
        }
    }
}
