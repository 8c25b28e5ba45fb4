//! Frame-to-frame stabilization of OCR detections.
//!
//! [`BoxTracker`] is a synchronous state machine. Every non-empty batch is
//! matched against the previous region set, matched lines are smoothed toward
//! their new position in sensor space, and the resulting set is mapped into
//! display space and de-overlapped. Empty batches do not clear the set right
//! away: the tracker enters [`TrackerState::Draining`] and hands out a
//! [`ClearTicket`] that only takes effect if no new non-empty batch bumps the
//! generation before the debounce deadline.
//!
//! Time is whatever the caller passes in as batch timestamps, so the tracker
//! never reads a clock on its own.

use std::time::Duration;

use lens_types::{DetectedLine, DetectionBatch, ImageSize, Rect, TrackedRegion};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geometry::{
    DEFAULT_BOX_THRESHOLD, DEFAULT_SMOOTHING_ALPHA, box_similar, smooth, text_similarity,
};
use crate::layout::{DEFAULT_SPACING, resolve_overlaps};
use crate::preprocess::{DefaultPreprocessor, Preprocessor};
use crate::transform::ViewTransform;

fn default_smoothing_alpha() -> f32 {
    DEFAULT_SMOOTHING_ALPHA
}

fn default_box_threshold_px() -> f32 {
    DEFAULT_BOX_THRESHOLD
}

fn default_text_threshold() -> f32 {
    0.7
}

fn default_spacing_px() -> f32 {
    DEFAULT_SPACING
}

fn default_clear_debounce_ms() -> u64 {
    800
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Weight of the fresh observation when smoothing a matched box
    #[serde(default = "default_smoothing_alpha")]
    pub smoothing_alpha: f32,
    /// Per-edge tolerance for two boxes to count as the same position
    #[serde(default = "default_box_threshold_px")]
    pub box_threshold_px: f32,
    /// Text similarity a match must exceed
    #[serde(default = "default_text_threshold")]
    pub text_threshold: f32,
    #[serde(default = "default_spacing_px")]
    pub spacing_px: f32,
    /// How long empty batches are tolerated before the overlay is cleared
    #[serde(default = "default_clear_debounce_ms")]
    pub clear_debounce_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: default_smoothing_alpha(),
            box_threshold_px: default_box_threshold_px(),
            text_threshold: default_text_threshold(),
            spacing_px: default_spacing_px(),
            clear_debounce_ms: default_clear_debounce_ms(),
        }
    }
}

impl TrackerConfig {
    pub fn clear_debounce(&self) -> Duration {
        Duration::from_millis(self.clear_debounce_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Empty,
    Tracking,
    /// Last batch was empty, a clear is pending
    Draining,
}

/// A scheduled clear, valid only for the generation it was issued in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearTicket {
    pub generation: u64,
    pub deadline: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerUpdate {
    /// The region set was replaced
    Replaced,
    /// Entered draining; fire the ticket once its deadline passes
    ClearScheduled(ClearTicket),
    Unchanged,
}

/// One new line scored against one previous region
#[derive(Debug, Clone, Copy)]
struct MatchCandidate<'a> {
    previous: &'a TrackedRegion,
    text_similarity: f32,
    position_bonus: f32,
}

impl<'a> MatchCandidate<'a> {
    fn score(line: &DetectedLine, previous: &'a TrackedRegion, config: &TrackerConfig) -> Self {
        let similar = box_similar(
            &previous.smoothed_rect,
            &line.bounding_box,
            config.box_threshold_px,
        );

        Self {
            previous,
            text_similarity: text_similarity(&previous.text, &line.text),
            position_bonus: if similar { 1.0 } else { 0.0 },
        }
    }

    fn total(&self) -> f32 {
        self.text_similarity + self.position_bonus
    }

    // text alone or position alone is not enough
    fn is_acceptable(&self, config: &TrackerConfig) -> bool {
        self.text_similarity > config.text_threshold && self.position_bonus == 1.0
    }
}

fn best_match<'a>(
    line: &DetectedLine,
    previous: &'a [TrackedRegion],
    config: &TrackerConfig,
) -> Option<&'a TrackedRegion> {
    previous
        .iter()
        .map(|prev| MatchCandidate::score(line, prev, config))
        .fold(None, |best: Option<MatchCandidate<'a>>, candidate| match best {
            Some(best) if best.total() >= candidate.total() => Some(best),
            _ => Some(candidate),
        })
        .filter(|candidate| candidate.is_acceptable(config))
        .map(|candidate| candidate.previous)
}

pub struct BoxTracker {
    config: TrackerConfig,
    viewport: ImageSize,
    regions: Vec<TrackedRegion>,
    state: TrackerState,
    generation: u64,
    pending_clear: Option<ClearTicket>,
    /// Timestamp of the last non-empty batch, the debounce anchor
    last_detection_at: Duration,
    /// Source geometry of the batch that produced `regions`
    source: Option<(ImageSize, i32)>,
}

impl BoxTracker {
    pub fn new(config: TrackerConfig, viewport: ImageSize) -> Self {
        Self {
            config,
            viewport,
            regions: Vec::new(),
            state: TrackerState::Empty,
            generation: 0,
            pending_clear: None,
            last_detection_at: Duration::ZERO,
            source: None,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Current regions in render order
    pub fn regions(&self) -> &[TrackedRegion] {
        &self.regions
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_clear(&self) -> Option<ClearTicket> {
        self.pending_clear
    }

    pub fn viewport(&self) -> ImageSize {
        self.viewport
    }

    /// Apply one detection batch
    pub fn submit(&mut self, batch: &DetectionBatch) -> TrackerUpdate {
        let lines = sanitize(&batch.lines);

        if lines.is_empty() {
            return self.on_empty(batch.timestamp);
        }

        let view = ViewTransform::new(batch.image_size, batch.rotation_degrees, self.viewport);
        let view = match view {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!("Dropping detection batch: {}", e);
                return TrackerUpdate::Unchanged;
            }
        };

        let previous = std::mem::take(&mut self.regions);
        let mut matched = 0usize;

        let smoothed: Vec<(String, Rect)> = lines
            .into_iter()
            .map(|line| match best_match(&line, &previous, &self.config) {
                Some(prev) => {
                    matched += 1;
                    let rect = smooth(
                        &prev.smoothed_rect,
                        &line.bounding_box,
                        self.config.smoothing_alpha,
                    );
                    (line.text, rect)
                }
                None => (line.text, line.bounding_box),
            })
            .collect();

        tracing::debug!(
            "Tracker batch: {} lines, {} matched, {} new",
            smoothed.len(),
            matched,
            smoothed.len() - matched
        );

        self.regions = self.layout(smoothed, &view);
        self.source = Some((batch.image_size, batch.rotation_degrees));
        self.generation += 1;
        self.pending_clear = None;
        self.last_detection_at = batch.timestamp;
        self.state = TrackerState::Tracking;

        TrackerUpdate::Replaced
    }

    /// Clear the set if `ticket` is still the pending one.
    ///
    /// Returns false for stale tickets, which are ignored.
    pub fn expire(&mut self, ticket: ClearTicket) -> bool {
        if self.state != TrackerState::Draining || self.pending_clear != Some(ticket) {
            tracing::debug!(
                "Ignoring stale clear (ticket generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        tracing::debug!("Debounce elapsed, clearing {} regions", self.regions.len());
        self.regions.clear();
        self.pending_clear = None;
        self.state = TrackerState::Empty;
        true
    }

    /// Polling alternative to [`expire`](Self::expire)
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.pending_clear {
            Some(ticket) if now >= ticket.deadline => self.expire(ticket),
            _ => false,
        }
    }

    /// Change the display surface and re-derive display rectangles
    pub fn set_viewport(&mut self, viewport: ImageSize) -> Result<(), GeometryError> {
        if viewport.is_empty() {
            return Err(GeometryError::EmptyDestination {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = viewport;

        if let Some((image_size, rotation)) = self.source {
            let view = ViewTransform::new(image_size, rotation, viewport)?;
            let current: Vec<(String, Rect)> = std::mem::take(&mut self.regions)
                .into_iter()
                .map(|region| (region.text, region.smoothed_rect))
                .collect();
            self.regions = self.layout(current, &view);
        }

        Ok(())
    }

    /// Drop all state, as after a camera session restart
    pub fn reset(&mut self) {
        self.regions.clear();
        self.source = None;
        self.pending_clear = None;
        self.state = TrackerState::Empty;
        // invalidates any ticket still in flight
        self.generation += 1;
    }

    fn on_empty(&mut self, now: Duration) -> TrackerUpdate {
        match self.state {
            TrackerState::Tracking => {
                // deadline may already be behind `now` when the first empty batch is late
                let ticket = ClearTicket {
                    generation: self.generation,
                    deadline: self.last_detection_at + self.config.clear_debounce(),
                };
                tracing::debug!(
                    "Empty batch at {:?}, clear scheduled for {:?}",
                    now,
                    ticket.deadline
                );
                self.pending_clear = Some(ticket);
                self.state = TrackerState::Draining;
                TrackerUpdate::ClearScheduled(ticket)
            }
            // already draining: the running timer is kept
            TrackerState::Draining | TrackerState::Empty => TrackerUpdate::Unchanged,
        }
    }

    fn layout(&self, smoothed: Vec<(String, Rect)>, view: &ViewTransform) -> Vec<TrackedRegion> {
        let regions = smoothed
            .into_iter()
            .filter_map(|(text, smoothed_rect)| match view.map_rect(&smoothed_rect) {
                Ok(display_rect) => Some(TrackedRegion {
                    text,
                    smoothed_rect,
                    display_rect,
                }),
                Err(e) => {
                    tracing::warn!("Dropping region '{}': {}", text, e);
                    None
                }
            })
            .collect();

        resolve_overlaps(regions, self.config.spacing_px)
    }
}

/// Valid rectangles only, with normalized text
fn sanitize(lines: &[DetectedLine]) -> Vec<DetectedLine> {
    let mut dropped = 0usize;
    let kept: Vec<DetectedLine> = lines
        .iter()
        .filter(|line| {
            let valid = line.bounding_box.is_valid();
            if !valid {
                tracing::debug!(
                    "Dropping line '{}' with invalid box {:?}",
                    line.text,
                    line.bounding_box
                );
                dropped += 1;
            }
            valid
        })
        .map(|line| DetectedLine {
            text: DefaultPreprocessor.process(&line.text),
            bounding_box: line.bounding_box,
        })
        .collect();

    if dropped > 0 {
        tracing::warn!("Dropped {} lines with invalid boxes", dropped);
    }
    kept
}
