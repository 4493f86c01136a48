//! Wheel input events for canvas interaction.

use serde::{Deserialize, Serialize};

/// Unit of the deltas carried by a [`WheelEvent`].
///
/// Mirrors the DOM `deltaMode` values. Carried for the host's benefit; the
/// classifier never consults it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaMode {
    /// Deltas are in pixels (`DOM_DELTA_PIXEL`).
    #[default]
    Pixel,
    /// Deltas are in lines (`DOM_DELTA_LINE`).
    Line,
    /// Deltas are in pages (`DOM_DELTA_PAGE`).
    Page,
}

impl DeltaMode {
    /// Map a DOM `deltaMode` code to a mode. Unknown codes fall back to pixels.
    #[must_use]
    pub const fn from_dom(code: u32) -> Self {
        match code {
            1 => Self::Line,
            2 => Self::Page,
            _ => Self::Pixel,
        }
    }
}

/// A wheel event as delivered by the host environment.
///
/// Timestamps are milliseconds on a monotonically non-decreasing clock owned
/// by the host (e.g. `Event.timeStamp` in a browser).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelEvent {
    /// Horizontal scroll delta.
    #[serde(default)]
    pub delta_x: f64,
    /// Vertical scroll delta.
    pub delta_y: f64,
    /// Unit of the deltas.
    #[serde(default)]
    pub delta_mode: DeltaMode,
    /// Event timestamp in milliseconds.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
}

impl WheelEvent {
    /// Create a pixel-mode wheel event.
    #[must_use]
    pub const fn new(delta_x: f64, delta_y: f64, timestamp_ms: u64) -> Self {
        Self {
            delta_x,
            delta_y,
            delta_mode: DeltaMode::Pixel,
            timestamp_ms,
        }
    }

    /// Create a vertical-only pixel-mode wheel event.
    #[must_use]
    pub const fn vertical(delta_y: f64, timestamp_ms: u64) -> Self {
        Self::new(0.0, delta_y, timestamp_ms)
    }

    /// Set the delta mode.
    #[must_use]
    pub const fn with_delta_mode(mut self, delta_mode: DeltaMode) -> Self {
        self.delta_mode = delta_mode;
        self
    }

    /// The history sample this event contributes.
    #[must_use]
    pub const fn scroll_delta(&self) -> ScrollDelta {
        ScrollDelta {
            delta_y: self.delta_y,
            timestamp_ms: self.timestamp_ms,
        }
    }
}

/// A vertical delta sample retained in the classifier's history window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollDelta {
    /// Vertical scroll delta.
    pub delta_y: f64,
    /// Timestamp in milliseconds.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
}

impl ScrollDelta {
    /// Milliseconds elapsed between this sample and `now_ms`.
    ///
    /// Saturates at zero when the host delivers timestamps out of order.
    #[must_use]
    pub const fn age_at(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp_ms)
    }
}
