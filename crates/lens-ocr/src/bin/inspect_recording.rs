//! Summarize a recorded capture session - run with:
//! cargo run -p lens-ocr --bin inspect_recording -- session.jsonl

use std::path::PathBuf;

use anyhow::{Context, Result};
use lens_ocr::{RecordedEvent, Recording};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let path: PathBuf = std::env::args()
        .nth(1)
        .context("usage: inspect_recording <recording.jsonl>")?
        .into();

    let recording = Recording::load(&path)?;

    let mut failed = 0usize;
    let mut empty = 0usize;
    let mut lines = 0usize;
    let mut taps = 0usize;

    for event in recording.events() {
        match event {
            RecordedEvent::Frame(frame) if frame.error.is_some() => failed += 1,
            RecordedEvent::Frame(frame) if frame.lines.is_empty() => empty += 1,
            RecordedEvent::Frame(frame) => lines += frame.lines.len(),
            RecordedEvent::Tap { .. } => taps += 1,
            RecordedEvent::Save { .. } | RecordedEvent::Dismiss { .. } => {}
        }
    }

    let frames = recording.frames().count();
    let duration = recording
        .events()
        .last()
        .map(|event| event.timestamp())
        .unwrap_or_default();

    tracing::info!("{} frames over {:?}", frames, duration);
    tracing::info!("  {} failed, {} empty, {} lines recognized", failed, empty, lines);
    tracing::info!("  {} taps", taps);

    for frame in recording.frames().filter(|f| !f.lines.is_empty()).take(3) {
        tracing::info!("  frame {} @ {}ms:", frame.sequence, frame.timestamp_ms);
        for line in frame.lines.iter().take(5) {
            tracing::info!("    > {} {:?}", line.text, line.bounding_box);
        }
    }

    Ok(())
}
