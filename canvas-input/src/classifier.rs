//! # Wheel Gesture Classification
//!
//! Decides whether a wheel event came from a discrete mouse wheel or a
//! continuous trackpad gesture. Hosts see no hardware signal for this, so the
//! classifier looks at the event stream itself:
//!
//! ```text
//! event ──► prune history (500ms) ──► detent lock? ──yes──► MouseWheel
//!                                          │ no
//!                                          ▼
//!           deltaX != 0 ─► fractional deltaY ─► within 200ms of trackpad
//!                 │                │                    │
//!                 └────────────────┴────────────────────┴──► Trackpad
//!                                          │ none matched
//!                                          ▼
//!                           |deltaY| < threshold ? Trackpad : MouseWheel
//! ```
//!
//! A detent is the step size a physical wheel produces per click. Once three
//! or more samples in the window share a common divisor of at least
//! [`MIN_DETENT_VALUE`], every event is reported as a mouse wheel, even when
//! individual magnitudes are small enough to look like trackpad input.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{
    ClassifierConfig, SharedConfig, MIN_DETENT_VALUE, MIN_SAMPLES_FOR_DETENT,
    TRACKPAD_MAX_GAP_MS, WINDOW_MS,
};
use crate::event::{ScrollDelta, WheelEvent};

/// The device an event was attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputDevice {
    /// Continuous trackpad or touchpad gesture.
    Trackpad,
    /// Discrete-stepped mouse wheel.
    MouseWheel,
}

impl fmt::Display for InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trackpad => write!(f, "trackpad"),
            Self::MouseWheel => write!(f, "mouse wheel"),
        }
    }
}

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationReason {
    /// The history window has a consistent step size (the detected detent).
    Detent(u64),
    /// The event scrolled on both axes.
    TwoAxis,
    /// The vertical delta is not a whole number.
    Fractional,
    /// The event arrived shortly after a trackpad event.
    Continuation,
    /// The vertical magnitude is below the trackpad threshold.
    BelowThreshold,
    /// The vertical magnitude is at or above the trackpad threshold.
    AboveThreshold,
}

impl fmt::Display for ClassificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detent(step) => write!(f, "detent {step}"),
            Self::TwoAxis => write!(f, "two-axis"),
            Self::Fractional => write!(f, "fractional"),
            Self::Continuation => write!(f, "continuation"),
            Self::BelowThreshold => write!(f, "below threshold"),
            Self::AboveThreshold => write!(f, "above threshold"),
        }
    }
}

/// Outcome of classifying one wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The device the event was attributed to.
    pub device: InputDevice,
    /// The rule that decided it.
    pub reason: ClassificationReason,
}

impl Classification {
    const fn trackpad(reason: ClassificationReason) -> Self {
        Self {
            device: InputDevice::Trackpad,
            reason,
        }
    }

    const fn mouse_wheel(reason: ClassificationReason) -> Self {
        Self {
            device: InputDevice::MouseWheel,
            reason,
        }
    }

    /// Whether the event was attributed to a trackpad.
    #[must_use]
    pub const fn is_trackpad(&self) -> bool {
        matches!(self.device, InputDevice::Trackpad)
    }
}

/// Per-surface wheel event classifier.
///
/// Owns the history window and the continuation marker. Configuration is read
/// through a [`SharedConfig`] on every call, so the host can retune it live.
///
/// Timestamps must be non-decreasing across calls. Out-of-order timestamps do
/// not panic, but pruning and continuation then behave as if no time passed.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    /// Recent vertical deltas, oldest first.
    history: VecDeque<ScrollDelta>,
    /// Step size inferred from the current window.
    detected_detent: Option<u64>,
    /// Most recent event classified as trackpad.
    last_trackpad_event: Option<WheelEvent>,
    config: SharedConfig,
}

impl GestureClassifier {
    /// Create a classifier with its own default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier reading from a shared configuration handle.
    #[must_use]
    pub fn with_config(config: impl Into<SharedConfig>) -> Self {
        Self {
            config: config.into(),
            ..Self::default()
        }
    }

    /// The configuration handle this classifier reads from.
    #[must_use]
    pub const fn config_handle(&self) -> &SharedConfig {
        &self.config
    }

    /// Snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> ClassifierConfig {
        self.config.get()
    }

    /// Classify a wheel event. Returns `true` for trackpad, `false` for a
    /// mouse wheel.
    pub fn classify(&mut self, event: &WheelEvent) -> bool {
        self.classify_detailed(event).is_trackpad()
    }

    /// Classify a wheel event and report which rule decided it.
    pub fn classify_detailed(&mut self, event: &WheelEvent) -> Classification {
        let config = self.config.get();
        self.record(event);

        if let Some(step) = self.update_detent(&config) {
            tracing::trace!(step, delta_y = event.delta_y, "Mouse wheel (detent)");
            return Classification::mouse_wheel(ClassificationReason::Detent(step));
        }

        let reason = if event.delta_x != 0.0 {
            ClassificationReason::TwoAxis
        } else if !is_integer(event.delta_y) {
            ClassificationReason::Fractional
        } else if self.is_continuation(event) {
            if event.delta_y.abs() >= config.trackpad_threshold {
                tracing::debug!(
                    delta_y = event.delta_y,
                    threshold = config.trackpad_threshold,
                    "Trackpad continuation overrides magnitude"
                );
            }
            ClassificationReason::Continuation
        } else if event.delta_y.abs() < config.trackpad_threshold {
            ClassificationReason::BelowThreshold
        } else {
            tracing::trace!(delta_y = event.delta_y, "Mouse wheel (magnitude)");
            return Classification::mouse_wheel(ClassificationReason::AboveThreshold);
        };

        tracing::trace!(%reason, delta_y = event.delta_y, "Trackpad");
        self.last_trackpad_event = Some(*event);
        Classification::trackpad(reason)
    }

    /// Step size inferred from the current window, if any.
    #[must_use]
    pub const fn detected_detent(&self) -> Option<u64> {
        self.detected_detent
    }

    /// Samples currently in the history window, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ScrollDelta> + '_ {
        self.history.iter()
    }

    /// Number of samples in the history window.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Most recent event classified as trackpad.
    #[must_use]
    pub const fn last_trackpad_event(&self) -> Option<&WheelEvent> {
        self.last_trackpad_event.as_ref()
    }

    /// Forget all history, the detected detent and the continuation marker.
    pub fn reset(&mut self) {
        self.history.clear();
        self.detected_detent = None;
        self.last_trackpad_event = None;
        tracing::debug!("Gesture classifier reset");
    }

    /// Evict samples that fell out of the window at `event`'s time, then
    /// append `event`.
    fn record(&mut self, event: &WheelEvent) {
        let now = event.timestamp_ms;
        self.history.retain(|delta| delta.age_at(now) < WINDOW_MS);
        self.history.push_back(event.scroll_delta());
    }

    /// Recompute the detent from the current window.
    fn update_detent(&mut self, config: &ClassifierConfig) -> Option<u64> {
        let detent = if config.detent_detection_enabled
            && self.history.len() >= MIN_SAMPLES_FOR_DETENT
        {
            detect_detent(self.history.iter().map(|delta| delta.delta_y))
        } else {
            None
        };

        if detent != self.detected_detent {
            tracing::debug!(previous = ?self.detected_detent, current = ?detent, "Detent changed");
        }
        self.detected_detent = detent;
        detent
    }

    fn is_continuation(&self, event: &WheelEvent) -> bool {
        self.last_trackpad_event.is_some_and(|last| {
            event.timestamp_ms.saturating_sub(last.timestamp_ms) < TRACKPAD_MAX_GAP_MS
        })
    }
}

/// Greatest common divisor of the rounded magnitudes, if it is a usable
/// detent.
///
/// Zero and non-finite deltas carry no step information and are skipped. At
/// least two non-zero steps are needed for a pattern.
fn detect_detent(deltas: impl IntoIterator<Item = f64>) -> Option<u64> {
    let steps: Vec<u64> = deltas
        .into_iter()
        .filter(|delta| delta.is_finite())
        .map(rounded_magnitude)
        .filter(|&step| step > 0)
        .collect();

    if steps.len() < 2 {
        return None;
    }

    let divisor = steps.iter().copied().fold(0, gcd);
    (divisor >= MIN_DETENT_VALUE).then_some(divisor)
}

/// `|round(delta)|`, with half-way cases rounded toward positive infinity.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Saturating cast of a non-negative whole number
fn rounded_magnitude(delta: f64) -> u64 {
    // `delta - floor` is exact, unlike `delta + 0.5`.
    let floor = delta.floor();
    let rounded = if delta - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded.abs() as u64
}

#[allow(clippy::float_cmp)] // Exact comparison is the point
fn is_integer(value: f64) -> bool {
    value.is_finite() && value.trunc() == value
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(classifier: &mut GestureClassifier, events: &[(f64, f64, u64)]) -> Vec<bool> {
        events
            .iter()
            .map(|&(delta_y, delta_x, timestamp)| {
                classifier.classify(&WheelEvent::new(delta_x, delta_y, timestamp))
            })
            .collect()
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(10, 20), 10);
        assert_eq!(gcd(10, 10), 10);
        assert_eq!(gcd(20, 40), 20);
        assert_eq!(gcd(10, 40), 10);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!([10, 20, 10, 40].into_iter().fold(0, gcd), 10);
    }

    #[test]
    fn test_rounded_magnitude() {
        assert_eq!(rounded_magnitude(2.5), 3);
        assert_eq!(rounded_magnitude(-2.5), 2);
        assert_eq!(rounded_magnitude(-10.0), 10);
        assert_eq!(rounded_magnitude(0.4), 0);
        assert_eq!(rounded_magnitude(0.499_999_999_999_999_94), 0);
        assert_eq!(rounded_magnitude(-0.499_999_999_999_999_94), 0);
        assert_eq!(
            rounded_magnitude(4_503_599_627_370_497.0),
            4_503_599_627_370_497
        );
    }

    #[test]
    fn test_near_half_sample_is_discarded_from_detent() {
        let mut classifier = GestureClassifier::new();
        let results = feed(
            &mut classifier,
            &[
                (10.0, 0.0, 100),
                (0.499_999_999_999_999_94, 0.0, 150),
                (20.0, 0.0, 200),
            ],
        );
        assert_eq!(results, vec![true, true, false]);
        assert_eq!(classifier.detected_detent(), Some(10));
    }

    #[test]
    fn test_is_integer() {
        assert!(is_integer(10.0));
        assert!(is_integer(-120.0));
        assert!(is_integer(0.0));
        assert!(!is_integer(5.5));
        assert!(!is_integer(f64::NAN));
        assert!(!is_integer(f64::INFINITY));
    }

    #[test]
    fn test_detect_detent() {
        assert_eq!(detect_detent([10.0, 20.0, 10.0]), Some(10));
        assert_eq!(detect_detent([-10.0, 20.0, -30.0]), Some(10));
        assert_eq!(detect_detent([3.0, 6.0, 3.0]), None);
        assert_eq!(detect_detent([120.0, -120.0, 240.0]), Some(120));
    }

    #[test]
    fn test_detect_detent_needs_two_non_zero_steps() {
        assert_eq!(detect_detent([0.0, 0.0, 10.0]), None);
        assert_eq!(detect_detent(Vec::new()), None);
        assert_eq!(detect_detent([0.0, 10.0, 20.0]), Some(10));
    }

    #[test]
    fn test_detect_detent_skips_non_finite() {
        assert_eq!(detect_detent([f64::NAN, 10.0, f64::INFINITY, 20.0]), Some(10));
    }

    #[test]
    fn test_detects_linux_high_dpi_detent() {
        let mut classifier = GestureClassifier::new();
        let events = [
            (10.0, 0.0, 100),
            (20.0, 0.0, 150),
            (10.0, 0.0, 200),
            (40.0, 0.0, 250),
            (10.0, 0.0, 300),
        ];

        for (index, &(delta_y, delta_x, timestamp)) in events.iter().enumerate() {
            let is_trackpad = classifier.classify(&WheelEvent::new(delta_x, delta_y, timestamp));
            if index >= 2 {
                assert!(!is_trackpad, "event {index} should be a mouse wheel");
                assert_eq!(classifier.detected_detent(), Some(10));
            }
        }
    }

    #[test]
    fn test_concrete_scenario() {
        let mut classifier = GestureClassifier::new();
        let results = feed(
            &mut classifier,
            &[
                (10.0, 0.0, 100),
                (20.0, 0.0, 150),
                (10.0, 0.0, 200),
                (40.0, 0.0, 250),
            ],
        );
        assert_eq!(results, vec![true, true, false, false]);
        assert_eq!(classifier.detected_detent(), Some(10));
    }

    #[test]
    fn test_traditional_wheel_detent() {
        let mut classifier = GestureClassifier::new();
        let results = feed(
            &mut classifier,
            &[
                (120.0, 0.0, 100),
                (-120.0, 0.0, 200),
                (240.0, 0.0, 300),
                (120.0, 0.0, 400),
            ],
        );
        assert_eq!(results, vec![false; 4]);
        assert_eq!(classifier.detected_detent(), Some(120));
    }

    #[test]
    fn test_small_gcd_is_not_a_detent() {
        let mut classifier = GestureClassifier::new();
        let results = feed(
            &mut classifier,
            &[(3.0, 0.0, 100), (6.0, 0.0, 150), (3.0, 0.0, 200), (9.0, 0.0, 250)],
        );
        assert_eq!(results, vec![true; 4]);
        assert_eq!(classifier.detected_detent(), None);
    }

    #[test]
    fn test_smooth_trackpad_values() {
        let mut classifier = GestureClassifier::new();
        let results = feed(
            &mut classifier,
            &[
                (2.5, 0.0, 100),
                (5.75, 0.25, 110),
                (8.333, 0.0, 120),
                (3.14159, 0.0, 130),
            ],
        );
        assert_eq!(results, vec![true; 4]);
    }

    #[test]
    fn test_horizontal_scroll_is_trackpad() {
        let mut classifier = GestureClassifier::new();
        let classification = classifier.classify_detailed(&WheelEvent::new(10.0, 5.0, 100));
        assert_eq!(classification.device, InputDevice::Trackpad);
        assert_eq!(classification.reason, ClassificationReason::TwoAxis);
    }

    #[test]
    fn test_continuation_within_gap() {
        let mut classifier = GestureClassifier::new();
        assert!(classifier.classify(&WheelEvent::vertical(5.0, 100)));
        let classification = classifier.classify_detailed(&WheelEvent::vertical(100.0, 150));
        assert!(classification.is_trackpad());
        assert_eq!(classification.reason, ClassificationReason::Continuation);
    }

    #[test]
    fn test_no_continuation_after_gap() {
        let mut classifier = GestureClassifier::new();
        classifier.classify(&WheelEvent::vertical(5.0, 100));
        let classification = classifier.classify_detailed(&WheelEvent::vertical(100.0, 350));
        assert!(!classification.is_trackpad());
        assert_eq!(classification.reason, ClassificationReason::AboveThreshold);
    }

    #[test]
    fn test_continuation_boundary_is_exclusive() {
        let mut classifier = GestureClassifier::new();
        classifier.classify(&WheelEvent::vertical(5.0, 100));
        assert!(!classifier.classify(&WheelEvent::vertical(100.0, 300)));
    }

    #[test]
    fn test_saves_last_trackpad_event_on_first_detection() {
        let mut classifier = GestureClassifier::new();
        let event = WheelEvent::vertical(5.0, 100);

        assert!(classifier.last_trackpad_event().is_none());
        classifier.classify(&event);
        assert_eq!(classifier.last_trackpad_event(), Some(&event));
    }

    #[test]
    fn test_updates_last_trackpad_event_on_continuation() {
        let mut classifier = GestureClassifier::new();
        let second = WheelEvent::vertical(8.0, 150);

        classifier.classify(&WheelEvent::vertical(5.0, 100));
        classifier.classify(&second);
        assert_eq!(classifier.last_trackpad_event(), Some(&second));
    }

    #[test]
    fn test_mouse_wheel_leaves_marker_untouched() {
        let mut classifier = GestureClassifier::new();
        let first = WheelEvent::vertical(5.0, 100);

        classifier.classify(&first);
        assert!(!classifier.classify(&WheelEvent::vertical(120.0, 400)));
        assert_eq!(classifier.last_trackpad_event(), Some(&first));
    }

    #[test]
    fn test_detent_lock_overrides_two_axis_and_fractional() {
        let mut classifier = GestureClassifier::new();
        feed(&mut classifier, &[(10.0, 0.0, 100), (20.0, 0.0, 150)]);

        let two_axis = classifier.classify_detailed(&WheelEvent::new(3.0, 10.0, 200));
        assert_eq!(two_axis.device, InputDevice::MouseWheel);
        assert_eq!(two_axis.reason, ClassificationReason::Detent(10));

        let fractional = classifier.classify_detailed(&WheelEvent::vertical(19.8, 250));
        assert_eq!(fractional.device, InputDevice::MouseWheel);
        assert_eq!(fractional.reason, ClassificationReason::Detent(10));
    }

    #[test]
    fn test_detent_lock_leaves_marker_untouched() {
        let mut classifier = GestureClassifier::new();
        feed(&mut classifier, &[(10.0, 0.0, 100), (20.0, 0.0, 150)]);
        let marker = classifier.last_trackpad_event().copied();

        assert!(!classifier.classify(&WheelEvent::vertical(10.0, 200)));
        assert_eq!(classifier.last_trackpad_event().copied(), marker);
    }

    #[test]
    fn test_non_integer_delta_is_trackpad() {
        let mut classifier = GestureClassifier::new();
        let classification = classifier.classify_detailed(&WheelEvent::vertical(5.5, 100));
        assert_eq!(classification.reason, ClassificationReason::Fractional);
    }

    #[test]
    fn test_small_pixel_delta_is_trackpad() {
        let mut classifier = GestureClassifier::new();
        let classification = classifier.classify_detailed(&WheelEvent::vertical(3.0, 100));
        assert!(classification.is_trackpad());
        assert_eq!(classification.reason, ClassificationReason::BelowThreshold);
    }

    #[test]
    fn test_zero_delta_is_trackpad() {
        let mut classifier = GestureClassifier::new();
        assert!(classifier.classify(&WheelEvent::new(0.0, 0.0, 100)));
    }

    #[test]
    fn test_non_finite_deltas_do_not_panic() {
        let mut classifier = GestureClassifier::new();
        assert!(classifier.classify(&WheelEvent::vertical(f64::NAN, 100)));
        assert!(classifier.classify(&WheelEvent::vertical(f64::INFINITY, 110)));
        assert!(classifier.classify(&WheelEvent::new(f64::NAN, 10.0, 120)));
        assert_eq!(classifier.detected_detent(), None);
    }

    #[test]
    fn test_respects_detent_detection_flag() {
        let config = SharedConfig::new(ClassifierConfig::default().with_detent_detection(false));
        let mut classifier = GestureClassifier::with_config(config);
        feed(
            &mut classifier,
            &[
                (10.0, 0.0, 100),
                (20.0, 0.0, 150),
                (10.0, 0.0, 200),
                (30.0, 0.0, 250),
            ],
        );
        assert_eq!(classifier.detected_detent(), None);
    }

    #[test]
    fn test_respects_trackpad_threshold() {
        let config = ClassifierConfig::default().with_trackpad_threshold(30.0);
        let mut classifier = GestureClassifier::with_config(config);
        assert!(!classifier.classify(&WheelEvent::vertical(40.0, 100)));
    }

    #[test]
    fn test_negative_deltas_in_detent_detection() {
        let mut classifier = GestureClassifier::new();
        let events = [
            (-10.0, 0.0, 100),
            (20.0, 0.0, 150),
            (-30.0, 0.0, 200),
            (10.0, 0.0, 250),
        ];
        for (index, &(delta_y, delta_x, timestamp)) in events.iter().enumerate() {
            classifier.classify(&WheelEvent::new(delta_x, delta_y, timestamp));
            if index >= 2 {
                assert_eq!(classifier.detected_detent(), Some(10));
            }
        }
    }

    #[test]
    fn test_clears_old_events_from_history() {
        let mut classifier = GestureClassifier::new();
        classifier.classify(&WheelEvent::vertical(10.0, 100));
        classifier.classify(&WheelEvent::vertical(20.0, 700));

        assert_eq!(classifier.history_len(), 1);
        let newest = classifier.history().next().copied();
        assert_eq!(newest.map(|delta| delta.timestamp_ms), Some(700));
    }

    #[test]
    fn test_window_boundary_evicts_at_exactly_window() {
        let mut classifier = GestureClassifier::new();
        classifier.classify(&WheelEvent::vertical(10.0, 100));
        classifier.classify(&WheelEvent::vertical(10.0, 599));
        assert_eq!(classifier.history_len(), 2);
        classifier.classify(&WheelEvent::vertical(10.0, 600));
        assert_eq!(classifier.history_len(), 2);
    }

    #[test]
    fn test_detent_clears_when_pattern_leaves_window() {
        let mut classifier = GestureClassifier::new();
        feed(
            &mut classifier,
            &[(10.0, 0.0, 100), (20.0, 0.0, 150), (10.0, 0.0, 200)],
        );
        assert_eq!(classifier.detected_detent(), Some(10));

        assert!(classifier.classify(&WheelEvent::vertical(4.0, 1000)));
        assert_eq!(classifier.detected_detent(), None);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut classifier = GestureClassifier::new();
        feed(
            &mut classifier,
            &[(10.0, 0.0, 100), (20.0, 0.0, 150), (10.0, 0.0, 200)],
        );
        classifier.reset();

        assert_eq!(classifier.history_len(), 0);
        assert_eq!(classifier.detected_detent(), None);
        assert!(classifier.last_trackpad_event().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(InputDevice::MouseWheel.to_string(), "mouse wheel");
        assert_eq!(ClassificationReason::Detent(10).to_string(), "detent 10");
        assert_eq!(
            ClassificationReason::BelowThreshold.to_string(),
            "below threshold"
        );
    }
}
