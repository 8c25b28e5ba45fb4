//! Greedy downward de-overlap of overlay regions.
//!
//! One forward pass over the regions sorted by top edge. A region that sits
//! too close to its predecessor is pushed down, which may cascade into the
//! next pair within the same pass. Nothing ever moves up, and only pairs that
//! are adjacent in sorted order are guaranteed to keep `spacing` between them.

use lens_types::{Rect, TrackedRegion};

/// Minimum vertical gap between stacked regions, in display pixels
pub const DEFAULT_SPACING: f32 = 3.0;

/// Anything carrying the rectangle the resolver lays out
pub trait Placed {
    fn rect(&self) -> &Rect;
    fn rect_mut(&mut self) -> &mut Rect;
}

impl Placed for Rect {
    fn rect(&self) -> &Rect {
        self
    }

    fn rect_mut(&mut self) -> &mut Rect {
        self
    }
}

impl Placed for TrackedRegion {
    fn rect(&self) -> &Rect {
        &self.display_rect
    }

    fn rect_mut(&mut self) -> &mut Rect {
        &mut self.display_rect
    }
}

pub fn resolve_overlaps<T: Placed>(mut regions: Vec<T>, spacing: f32) -> Vec<T> {
    // stable: equal tops keep their input order
    regions.sort_by(|a, b| a.rect().top.total_cmp(&b.rect().top));

    for i in 1..regions.len() {
        let required_top = regions[i - 1].rect().bottom + spacing;
        let next = regions[i].rect_mut();

        if required_top > next.top {
            let overlap = required_top - next.top;
            next.top = required_top;
            next.bottom += overlap;
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_inputs_are_untouched() {
        assert!(resolve_overlaps(Vec::<Rect>::new(), DEFAULT_SPACING).is_empty());

        let single = vec![Rect::new(5.0, 5.0, 50.0, 25.0)];
        assert_eq!(resolve_overlaps(single.clone(), DEFAULT_SPACING), single);
    }

    #[test]
    fn overlapping_line_is_pushed_below_with_spacing() {
        let out = resolve_overlaps(
            vec![
                Rect::new(0.0, 0.0, 100.0, 20.0),
                Rect::new(0.0, 15.0, 100.0, 35.0),
            ],
            3.0,
        );
        assert_eq!(out[0], Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(out[1], Rect::new(0.0, 23.0, 100.0, 43.0));
    }

    #[test]
    fn input_is_sorted_by_top_before_resolving() {
        let out = resolve_overlaps(
            vec![
                Rect::new(0.0, 15.0, 100.0, 35.0),
                Rect::new(0.0, 0.0, 100.0, 20.0),
            ],
            3.0,
        );
        assert_eq!(out[0].top, 0.0);
        assert_eq!(out[1], Rect::new(0.0, 23.0, 100.0, 43.0));
    }

    #[test]
    fn equal_tops_keep_input_order() {
        let a = Rect::new(0.0, 10.0, 50.0, 30.0);
        let b = Rect::new(60.0, 10.0, 90.0, 20.0);
        let out = resolve_overlaps(vec![a, b], 3.0);
        assert_eq!(out[0], a);
        // b is pushed below a even though they do not overlap horizontally
        assert_eq!(out[1], Rect::new(60.0, 33.0, 90.0, 43.0));
    }

    #[test]
    fn pushes_cascade_within_one_pass() {
        let out = resolve_overlaps(
            vec![
                Rect::new(0.0, 0.0, 10.0, 20.0),
                Rect::new(0.0, 10.0, 10.0, 30.0),
                Rect::new(0.0, 30.0, 10.0, 40.0),
            ],
            3.0,
        );
        assert_eq!(out[1], Rect::new(0.0, 23.0, 10.0, 43.0));
        assert_eq!(out[2], Rect::new(0.0, 46.0, 10.0, 56.0));
    }

    #[test]
    fn gaps_are_never_closed() {
        let spaced = vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 100.0, 10.0, 110.0),
        ];
        assert_eq!(resolve_overlaps(spaced.clone(), 3.0), spaced);
    }

    #[test]
    fn adjacent_pairs_keep_spacing_after_resolution() {
        let input: Vec<Rect> = (0..40)
            .map(|i| {
                let top = ((i * 37) % 101) as f32 * 1.7;
                let height = 5.0 + (i % 7) as f32 * 3.3;
                Rect::new(0.0, top, 50.0, top + height)
            })
            .collect();

        let out = resolve_overlaps(input, 3.0);
        assert_eq!(out.len(), 40);
        for pair in out.windows(2) {
            assert!(pair[0].bottom + 3.0 <= pair[1].top);
        }
    }

    #[test]
    fn resolves_tracked_regions_by_display_rect() {
        let region = |text: &str, top: f32| TrackedRegion {
            text: text.to_string(),
            smoothed_rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            display_rect: Rect::new(0.0, top, 100.0, top + 20.0),
        };
        let out = resolve_overlaps(vec![region("b", 15.0), region("a", 0.0)], 3.0);
        assert_eq!(out[0].text, "a");
        assert_eq!(out[1].display_rect, Rect::new(0.0, 23.0, 100.0, 43.0));
        // sensor-space geometry is not touched by layout
        assert_eq!(out[1].smoothed_rect, Rect::new(0.0, 0.0, 1.0, 1.0));
    }
}
