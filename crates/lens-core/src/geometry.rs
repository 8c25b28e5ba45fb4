//! Stateless rectangle and text comparisons used by the tracker.

use std::collections::HashSet;

use lens_types::{Point, Rect};

/// OCR jitter tolerance per edge, in pixels
pub const DEFAULT_BOX_THRESHOLD: f32 = 40.0;

/// Fraction of the way each frame moves toward the fresh observation
pub const DEFAULT_SMOOTHING_ALPHA: f32 = 0.4;

/// Jaccard index of the whitespace-separated word sets of `a` and `b`.
///
/// Blank input on either side scores 0.
pub fn text_similarity(a: &str, b: &str) -> f32 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }

    let a: HashSet<&str> = a.split_whitespace().collect();
    let b: HashSet<&str> = b.split_whitespace().collect();

    let shared = a.intersection(&b).count();
    let total = a.union(&b).count();

    shared as f32 / total as f32
}

/// True when every edge of `a` is strictly closer than `threshold` to the same edge of `b`
pub fn box_similar(a: &Rect, b: &Rect, threshold: f32) -> bool {
    (a.left - b.left).abs() < threshold
        && (a.top - b.top).abs() < threshold
        && (a.right - b.right).abs() < threshold
        && (a.bottom - b.bottom).abs() < threshold
}

/// Per-edge linear interpolation from `old` toward `new`.
///
/// `alpha` is clamped to `[0, 1]`; the endpoints return the corresponding
/// rectangle unchanged.
pub fn smooth(old: &Rect, new: &Rect, alpha: f32) -> Rect {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha >= 1.0 {
        return *new;
    }
    if alpha <= 0.0 {
        return *old;
    }

    let lerp = |from: f32, to: f32| from + (to - from) * alpha;

    Rect::new(
        lerp(old.left, new.left),
        lerp(old.top, new.top),
        lerp(old.right, new.right),
        lerp(old.bottom, new.bottom),
    )
}

/// Inclusive on every edge
pub fn point_in_rect(point: Point, rect: &Rect) -> bool {
    point.x >= rect.left && point.x <= rect.right && point.y >= rect.top && point.y <= rect.bottom
}
