//! Classifier configuration.
//!
//! [`ClassifierConfig`] holds the two host tunables. [`SharedConfig`] wraps it
//! in a cloneable handle so a host can retune a live classifier: the host keeps
//! one clone, the classifier reads through another, and every change is seen
//! on the next classification call.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{InputError, InputResult};

/// Default magnitude below which an isolated event counts as trackpad input.
pub const DEFAULT_TRACKPAD_THRESHOLD: f64 = 60.0;

/// History retention window in milliseconds.
pub const WINDOW_MS: u64 = 500;

/// Maximum gap after a trackpad event for a follow-up to count as continuation.
pub const TRACKPAD_MAX_GAP_MS: u64 = 200;

/// Smallest step size accepted as a wheel detent.
pub const MIN_DETENT_VALUE: u64 = 5;

/// Minimum history length before detent inference runs.
pub const MIN_SAMPLES_FOR_DETENT: usize = 3;

/// Tunables read by every classification call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Magnitude (pixels) below which an isolated event is treated as trackpad.
    pub trackpad_threshold: f64,
    /// Whether detent inference runs.
    pub detent_detection_enabled: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            trackpad_threshold: DEFAULT_TRACKPAD_THRESHOLD,
            detent_detection_enabled: true,
        }
    }
}

impl ClassifierConfig {
    /// Set the trackpad threshold.
    #[must_use]
    pub const fn with_trackpad_threshold(mut self, threshold: f64) -> Self {
        self.trackpad_threshold = threshold;
        self
    }

    /// Enable or disable detent inference.
    #[must_use]
    pub const fn with_detent_detection(mut self, enabled: bool) -> Self {
        self.detent_detection_enabled = enabled;
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidConfig`] if the threshold is negative or
    /// not finite.
    pub fn validate(&self) -> InputResult<()> {
        if !self.trackpad_threshold.is_finite() || self.trackpad_threshold < 0.0 {
            return Err(InputError::InvalidConfig(format!(
                "trackpadThreshold must be a finite, non-negative number (got {})",
                self.trackpad_threshold
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// Missing fields take their default values; unknown fields are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Serialization`] if the JSON is malformed, or
    /// [`InputError::InvalidConfig`] if a value is out of range.
    pub fn from_json(json: &str) -> InputResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Cloneable handle to a [`ClassifierConfig`] shared between a host and its
/// classifiers.
///
/// Writers are expected to be serialized by the host (typically the UI thread).
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<ClassifierConfig>>,
}

impl SharedConfig {
    /// Create a handle holding `config`.
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Snapshot the current configuration.
    #[must_use]
    pub fn get(&self) -> ClassifierConfig {
        *self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Replace the whole configuration after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidConfig`] and leaves the current
    /// configuration untouched if `config` is invalid.
    pub fn try_update(&self, config: ClassifierConfig) -> InputResult<()> {
        config.validate()?;
        self.write(|current| *current = config);
        Ok(())
    }

    /// Set the trackpad threshold.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidConfig`] if the threshold is negative or
    /// not finite.
    pub fn set_trackpad_threshold(&self, threshold: f64) -> InputResult<()> {
        self.try_update(self.get().with_trackpad_threshold(threshold))
    }

    /// Enable or disable detent inference.
    pub fn set_detent_detection_enabled(&self, enabled: bool) {
        self.write(|current| current.detent_detection_enabled = enabled);
    }

    fn write(&self, f: impl FnOnce(&mut ClassifierConfig)) {
        let mut config = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut config);
        tracing::debug!(
            trackpad_threshold = config.trackpad_threshold,
            detent_detection_enabled = config.detent_detection_enabled,
            "Classifier config updated"
        );
    }
}

impl From<ClassifierConfig> for SharedConfig {
    fn from(config: ClassifierConfig) -> Self {
        Self::new(config)
    }
}
