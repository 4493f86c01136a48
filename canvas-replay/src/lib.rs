//! # Saorsa Canvas Replay
//!
//! Replays recorded wheel-event streams through the canvas gesture classifier.
//!
//! Useful for checking how a given device or driver will be treated before
//! touching the interaction code: record the browser's wheel events as JSON
//! lines, then replay them with the thresholds you want to try.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p canvas-replay -- recording.jsonl
//! ```
//!
//! ## With a config file and overrides:
//!
//! ```bash
//! cargo run -p canvas-replay -- --config input.json --threshold 40 --format json recording.jsonl
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ReplayConfig` - Input source, classifier configuration and output format
//! - `replay` - Event parsing, classification and record output

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod replay;

pub use replay::{parse_events, replay, write_records, ReplayRecord, ReplaySummary};

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use canvas_input::ClassifierConfig;
use clap::{Parser, ValueEnum};

/// Output format for replay records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Command-line arguments for canvas-replay.
#[derive(Debug, Clone, Parser)]
#[command(name = "canvas-replay")]
#[command(about = "Replay recorded wheel events through the gesture classifier")]
#[command(version)]
pub struct CliArgs {
    /// Recorded wheel events as JSON lines (stdin when omitted or "-")
    pub input: Option<PathBuf>,

    /// Classifier configuration file (JSON)
    #[arg(long, env = "CANVAS_INPUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Magnitude below which an isolated event counts as trackpad input
    #[arg(long, env = "CANVAS_TRACKPAD_THRESHOLD")]
    pub threshold: Option<f64>,

    /// Disable detent inference
    #[arg(long, env = "CANVAS_DISABLE_DETENT")]
    pub no_detent: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Replay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    /// Event source. `None` reads stdin.
    pub input: Option<PathBuf>,
    /// Classifier configuration.
    pub classifier: ClassifierConfig,
    /// Output format.
    pub format: OutputFormat,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            input: None,
            classifier: ClassifierConfig::default(),
            format: OutputFormat::Text,
        }
    }
}

impl ReplayConfig {
    /// Open the configured event source.
    ///
    /// # Errors
    ///
    /// Returns an error if the input file cannot be opened.
    pub fn open_input(&self) -> anyhow::Result<Box<dyn BufRead>> {
        match self.input.as_deref() {
            Some(path) if path != Path::new("-") => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            _ => Ok(Box::new(io::stdin().lock())),
        }
    }
}

impl TryFrom<CliArgs> for ReplayConfig {
    type Error = anyhow::Error;

    /// Layer the config file (if any) under the command-line overrides.
    fn try_from(args: CliArgs) -> anyhow::Result<Self> {
        let mut classifier = match args.config {
            Some(ref path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                ClassifierConfig::from_json(&json)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => ClassifierConfig::default(),
        };

        if let Some(threshold) = args.threshold {
            classifier = classifier.with_trackpad_threshold(threshold);
        }
        if args.no_detent {
            classifier = classifier.with_detent_detection(false);
        }
        classifier.validate()?;

        Ok(Self {
            input: args.input,
            classifier,
            format: args.format,
        })
    }
}
