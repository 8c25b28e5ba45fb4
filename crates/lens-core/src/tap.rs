use lens_types::{Point, TrackedRegion};

use crate::geometry::point_in_rect;

/// Topmost region under `point`.
///
/// `regions` is in render order, so the last drawn region wins where
/// display rectangles overlap.
pub fn route(point: Point, regions: &[TrackedRegion]) -> Option<&TrackedRegion> {
    regions
        .iter()
        .rev()
        .find(|region| point_in_rect(point, &region.display_rect))
}

#[cfg(test)]
mod tests {
    use lens_types::Rect;

    use super::*;

    fn region(text: &str, display_rect: Rect) -> TrackedRegion {
        TrackedRegion {
            text: text.to_string(),
            smoothed_rect: display_rect,
            display_rect,
        }
    }

    #[test]
    fn later_region_wins_on_overlap() {
        let regions = vec![
            region("A", Rect::new(10.0, 10.0, 50.0, 50.0)),
            region("B", Rect::new(0.0, 0.0, 100.0, 100.0)),
        ];
        let hit = route(Point::new(20.0, 20.0), &regions).unwrap();
        assert_eq!(hit.text, "B");
    }

    #[test]
    fn misses_return_none() {
        let regions = vec![region("A", Rect::new(10.0, 10.0, 50.0, 50.0))];
        assert!(route(Point::new(60.0, 20.0), &regions).is_none());
        assert!(route(Point::new(0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn boundary_taps_hit() {
        let regions = vec![
            region("A", Rect::new(0.0, 0.0, 10.0, 10.0)),
            region("B", Rect::new(0.0, 13.0, 10.0, 23.0)),
        ];
        assert_eq!(route(Point::new(10.0, 10.0), &regions).unwrap().text, "A");
        assert_eq!(route(Point::new(0.0, 13.0), &regions).unwrap().text, "B");
        assert!(route(Point::new(5.0, 11.5), &regions).is_none());
    }
}
