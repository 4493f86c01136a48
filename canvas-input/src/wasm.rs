//! WebAssembly bindings for canvas-input.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.

use wasm_bindgen::prelude::*;

use crate::{ClassifierConfig, DeltaMode, GestureClassifier, WheelEvent};

/// Initialize the input WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Gesture classifier instance for WASM.
#[wasm_bindgen]
pub struct WasmGestureClassifier {
    classifier: GestureClassifier,
}

#[wasm_bindgen]
impl WasmGestureClassifier {
    /// Create a classifier with the default configuration.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            classifier: GestureClassifier::new(),
        }
    }

    /// Create a classifier from a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error string if the JSON is malformed or a value is invalid.
    #[wasm_bindgen(js_name = fromConfigJson)]
    pub fn from_config_json(json: &str) -> Result<WasmGestureClassifier, String> {
        let config = ClassifierConfig::from_json(json).map_err(|e| e.to_string())?;
        Ok(Self {
            classifier: GestureClassifier::with_config(config),
        })
    }

    /// Classify raw wheel deltas. Returns `true` for trackpad input.
    pub fn classify(&mut self, delta_x: f64, delta_y: f64, timestamp: f64) -> bool {
        let event = WheelEvent::new(delta_x, delta_y, timestamp_ms(timestamp));
        self.classifier.classify(&event)
    }

    /// Classify a DOM wheel event. Returns `true` for trackpad input.
    #[wasm_bindgen(js_name = classifyWheelEvent)]
    pub fn classify_wheel_event(&mut self, event: &web_sys::WheelEvent) -> bool {
        let event = WheelEvent::new(
            event.delta_x(),
            event.delta_y(),
            timestamp_ms(event.time_stamp()),
        )
        .with_delta_mode(DeltaMode::from_dom(event.delta_mode()));
        self.classifier.classify(&event)
    }

    /// The detected wheel step size, if any.
    #[wasm_bindgen(getter, js_name = detectedDetent)]
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Detents are small step sizes
    pub fn detected_detent(&self) -> Option<f64> {
        self.classifier.detected_detent().map(|step| step as f64)
    }

    /// Number of samples in the history window.
    #[wasm_bindgen(getter, js_name = historyLength)]
    #[must_use]
    pub fn history_length(&self) -> usize {
        self.classifier.history_len()
    }

    /// Get the history window as JSON.
    #[wasm_bindgen(js_name = getHistoryJson)]
    #[must_use]
    pub fn get_history_json(&self) -> String {
        let history: Vec<_> = self.classifier.history().collect();
        serde_json::to_string(&history).unwrap_or_default()
    }

    /// Set the trackpad threshold.
    ///
    /// # Errors
    ///
    /// Returns an error string if the threshold is negative or not finite.
    #[wasm_bindgen(js_name = setTrackpadThreshold)]
    pub fn set_trackpad_threshold(&self, threshold: f64) -> Result<(), String> {
        self.classifier
            .config_handle()
            .set_trackpad_threshold(threshold)
            .map_err(|e| e.to_string())
    }

    /// Enable or disable detent detection.
    #[wasm_bindgen(js_name = setDetentDetectionEnabled)]
    pub fn set_detent_detection_enabled(&self, enabled: bool) {
        self.classifier
            .config_handle()
            .set_detent_detection_enabled(enabled);
    }

    /// Forget history, detent and continuation state.
    pub fn reset(&mut self) {
        self.classifier.reset();
    }
}

impl Default for WasmGestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a DOM high-resolution timestamp to whole milliseconds.
///
/// Rounding can move a gap across the continuation or history window
/// boundary: events 199.6ms apart may land exactly 200ms apart.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to non-negative
fn timestamp_ms(timestamp: f64) -> u64 {
    timestamp.max(0.0).round() as u64
}
