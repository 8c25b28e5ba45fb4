//! Recorded capture sessions.
//!
//! A recording is a JSON-lines file, one tagged event per line:
//!
//! ```text
//! {"type":"frame","sequence":0,"timestamp_ms":0,"image":{"width":640,"height":480},"rotation_degrees":90,"lines":[...]}
//! {"type":"frame","sequence":1,"timestamp_ms":33,"image":{"width":640,"height":480},"error":"engine busy"}
//! {"type":"tap","timestamp_ms":1200,"x":300.0,"y":610.0}
//! {"type":"save","timestamp_ms":2500}
//! {"type":"dismiss","timestamp_ms":3000}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use lens_types::{DetectedLine, ImageSize};
use serde::{Deserialize, Serialize};

use crate::Frame;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub sequence: u64,
    pub timestamp_ms: u64,
    pub image: ImageSize,
    #[serde(default)]
    pub rotation_degrees: i32,
    #[serde(default)]
    pub lines: Vec<DetectedLine>,
    /// Recognition failed for this frame
    #[serde(default)]
    pub error: Option<String>,
}

impl RecordedFrame {
    pub fn frame(&self) -> Frame {
        Frame {
            sequence: self.sequence,
            image_size: self.image,
            rotation_degrees: self.rotation_degrees,
            captured_at: Duration::from_millis(self.timestamp_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordedEvent {
    Frame(RecordedFrame),
    Tap { timestamp_ms: u64, x: f32, y: f32 },
    Save { timestamp_ms: u64 },
    Dismiss { timestamp_ms: u64 },
}

impl RecordedEvent {
    pub fn timestamp(&self) -> Duration {
        let ms = match self {
            RecordedEvent::Frame(frame) => frame.timestamp_ms,
            RecordedEvent::Tap { timestamp_ms, .. }
            | RecordedEvent::Save { timestamp_ms }
            | RecordedEvent::Dismiss { timestamp_ms } => *timestamp_ms,
        };
        Duration::from_millis(ms)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Recording {
    events: Vec<RecordedEvent>,
}

impl Recording {
    pub fn new(events: Vec<RecordedEvent>) -> Self {
        Self { events }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let recording = Self::parse(BufReader::new(file))
            .with_context(|| format!("Failed to read recording {}", path.display()))?;

        tracing::info!(
            "Loaded recording {}: {} events, {} frames",
            path.display(),
            recording.events.len(),
            recording.frames().count()
        );
        Ok(recording)
    }

    /// Parse JSON lines; blank lines are skipped
    pub fn parse(reader: impl BufRead) -> Result<Self> {
        let mut events = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let event: RecordedEvent = serde_json::from_str(&line)
                .with_context(|| format!("Invalid event on line {}", index + 1))?;
            events.push(event);
        }

        Ok(Self { events })
    }

    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    pub fn frames(&self) -> impl Iterator<Item = &RecordedFrame> {
        self.events.iter().filter_map(|event| match event {
            RecordedEvent::Frame(frame) => Some(frame),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
