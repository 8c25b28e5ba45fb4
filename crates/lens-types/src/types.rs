use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::{ImageSize, Point, Rect};

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Recognizer output for one frame
    DetectionBatch(DetectionBatch),
    /// Current overlay regions, in render order
    RegionsChanged(Vec<TrackedRegion>),
    Tap(Point),
    RegionSelected(TrackedRegion),
    TranslationUpdate(TranslateState),
    DismissTranslation,
    /// Persist the selected region together with its translation
    SaveNote,
    LoadNotes,
    NotesLoaded(Vec<Note>),
    OcrStatusUpdate {
        status: String,
        capturing: bool,
    },
    BackendReady,
}

/// One recognized text line, sensor-image pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLine {
    pub text: String,
    pub bounding_box: Rect,
}

impl DetectedLine {
    pub fn new(text: impl Into<String>, bounding_box: Rect) -> Self {
        Self {
            text: text.into(),
            bounding_box,
        }
    }
}

/// Everything the recognizer produced for a single frame
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionBatch {
    pub lines: Vec<DetectedLine>,
    pub image_size: ImageSize,
    pub rotation_degrees: i32,
    /// Time since the detection stream started
    pub timestamp: Duration,
}

/// Stabilized overlay unit.
///
/// `display_rect` is derived from `smoothed_rect` (coordinate transform, then
/// overlap resolution) and is only ever written by the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedRegion {
    pub text: String,
    pub smoothed_rect: Rect,
    pub display_rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub original_text: String,
    pub translated_text: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub original_text: String,
    pub translated_text: String,
    pub timestamp: i64,
}

impl NewNote {
    pub fn with_id(self, id: i64) -> Note {
        Note {
            id,
            original_text: self.original_text,
            translated_text: self.translated_text,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TranslateState {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}
