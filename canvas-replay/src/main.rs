//! # Saorsa Canvas Replay
//!
//! Replays recorded wheel events through the gesture classifier.

use std::io::{self, BufWriter};

use canvas_input::GestureClassifier;
use canvas_replay::{parse_events, replay, write_records, CliArgs, ReplayConfig, ReplaySummary};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing on stderr with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,canvas_replay=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,canvas_replay=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ReplayConfig::try_from(CliArgs::parse())?;
    tracing::info!(
        "Classifier config: threshold={} detent_detection={}",
        config.classifier.trackpad_threshold,
        config.classifier.detent_detection_enabled
    );

    let events = parse_events(config.open_input()?)?;

    let mut classifier = GestureClassifier::with_config(config.classifier);
    let records = replay(&mut classifier, &events);
    write_records(BufWriter::new(io::stdout().lock()), &records, config.format)?;

    let summary = ReplaySummary::from_records(&records);
    tracing::info!(
        total = summary.total,
        trackpad = summary.trackpad,
        mouse_wheel = summary.mouse_wheel,
        detent = ?summary.last_detent,
        "Replay finished"
    );
    Ok(())
}
