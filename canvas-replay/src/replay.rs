//! Event parsing, classification and record output.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use canvas_input::{ClassificationReason, GestureClassifier, InputDevice, WheelEvent};
use serde::Serialize;

use crate::OutputFormat;

/// Classification of one replayed event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayRecord {
    /// Position of the event in the stream (0-based).
    pub index: usize,
    /// Event timestamp in milliseconds.
    pub timestamp: u64,
    /// Horizontal delta.
    pub delta_x: f64,
    /// Vertical delta.
    pub delta_y: f64,
    /// The device the event was attributed to.
    pub device: InputDevice,
    /// The rule that decided it.
    pub reason: ClassificationReason,
    /// Detent detected after this event.
    pub detected_detent: Option<u64>,
}

/// Totals over a replayed stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Events replayed.
    pub total: usize,
    /// Events attributed to a trackpad.
    pub trackpad: usize,
    /// Events attributed to a mouse wheel.
    pub mouse_wheel: usize,
    /// Detent detected after the last event.
    pub last_detent: Option<u64>,
}

impl ReplaySummary {
    /// Summarize replayed records.
    #[must_use]
    pub fn from_records(records: &[ReplayRecord]) -> Self {
        let trackpad = records
            .iter()
            .filter(|record| record.device == InputDevice::Trackpad)
            .count();
        Self {
            total: records.len(),
            trackpad,
            mouse_wheel: records.len() - trackpad,
            last_detent: records.last().and_then(|record| record.detected_detent),
        }
    }
}

/// Parse newline-delimited JSON wheel events.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns an error naming the line number if reading fails or a line is not
/// a valid wheel event.
pub fn parse_events(reader: impl BufRead) -> Result<Vec<WheelEvent>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read line {line_number}"))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: WheelEvent = serde_json::from_str(line)
            .with_context(|| format!("Invalid wheel event on line {line_number}"))?;
        events.push(event);
    }
    tracing::debug!("Parsed {} wheel events", events.len());
    Ok(events)
}

/// Feed `events` in order through `classifier`.
pub fn replay(classifier: &mut GestureClassifier, events: &[WheelEvent]) -> Vec<ReplayRecord> {
    events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let classification = classifier.classify_detailed(event);
            ReplayRecord {
                index,
                timestamp: event.timestamp_ms,
                delta_x: event.delta_x,
                delta_y: event.delta_y,
                device: classification.device,
                reason: classification.reason,
                detected_detent: classifier.detected_detent(),
            }
        })
        .collect()
}

/// Write records in the requested format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_records(
    mut writer: impl Write,
    records: &[ReplayRecord],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            for record in records {
                serde_json::to_writer(&mut writer, record)?;
                writeln!(writer)?;
            }
        }
        OutputFormat::Text => {
            writeln!(
                writer,
                "{:>5} {:>10} {:>9} {:>9}  {:<11}  {:<16} detent",
                "#", "time_ms", "delta_x", "delta_y", "device", "reason"
            )?;
            for record in records {
                let detent = record
                    .detected_detent
                    .map_or_else(|| "-".to_string(), |step| step.to_string());
                writeln!(
                    writer,
                    "{:>5} {:>10} {:>9.3} {:>9.3}  {:<11}  {:<16} {}",
                    record.index,
                    record.timestamp,
                    record.delta_x,
                    record.delta_y,
                    record.device.to_string(),
                    record.reason.to_string(),
                    detent
                )?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
