//! # Saorsa Canvas Input
//!
//! Wheel input classification for interactive canvases.
//! Compiles to WASM so the browser host can classify events in place.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              canvas-input.wasm              │
//! ├─────────────────────────────────────────────┤
//! │  Events          │  Gesture Classifier      │
//! │  - WheelEvent    │  - History window        │
//! │  - ScrollDelta   │  - Detent inference      │
//! │  - DeltaMode     │  - Continuation          │
//! ├─────────────────────────────────────────────┤
//! │  Configuration                              │
//! │  - Shared, live-tunable threshold and flag  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use canvas_input::{GestureClassifier, WheelEvent};
//!
//! let mut classifier = GestureClassifier::new();
//! assert!(classifier.classify(&WheelEvent::vertical(2.5, 100)));
//! assert!(!classifier.classify(&WheelEvent::vertical(120.0, 900)));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod event;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use classifier::{Classification, ClassificationReason, GestureClassifier, InputDevice};
pub use config::{
    ClassifierConfig, SharedConfig, DEFAULT_TRACKPAD_THRESHOLD, MIN_DETENT_VALUE,
    MIN_SAMPLES_FOR_DETENT, TRACKPAD_MAX_GAP_MS, WINDOW_MS,
};
pub use error::{InputError, InputResult};
pub use event::{DeltaMode, ScrollDelta, WheelEvent};

/// Canvas input version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
