//! Sensor-image space to display space mapping.
//!
//! Sensor frames arrive unrotated while the preview is shown rotated, so a
//! quarter-turn rotation swaps the logical source dimensions. The preview fills
//! the viewport (center crop), which means a single uniform scale picked as the
//! larger of the two axis ratios, followed by a centering offset.

use lens_types::{ImageSize, Point, Rect};

use crate::error::GeometryError;

/// Uniform scale followed by a translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale: f32,
    dx: f32,
    dy: f32,
}

impl ViewTransform {
    pub fn new(
        source: ImageSize,
        rotation_degrees: i32,
        dest: ImageSize,
    ) -> Result<Self, GeometryError> {
        if source.is_empty() {
            return Err(GeometryError::EmptySource {
                width: source.width,
                height: source.height,
            });
        }
        if dest.is_empty() {
            return Err(GeometryError::EmptyDestination {
                width: dest.width,
                height: dest.height,
            });
        }

        let source = if swaps_axes(rotation_degrees) {
            source.transposed()
        } else {
            source
        };

        let (src_w, src_h) = (source.width as f32, source.height as f32);
        let (dst_w, dst_h) = (dest.width as f32, dest.height as f32);

        let scale = (dst_w / src_w).max(dst_h / src_h);

        Ok(Self {
            scale,
            dx: (dst_w - src_w * scale) / 2.0,
            dy: (dst_h - src_h * scale) / 2.0,
        })
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> (f32, f32) {
        (self.dx, self.dy)
    }

    pub fn map_point(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale + self.dx,
            point.y * self.scale + self.dy,
        )
    }

    /// Display point back into sensor-image space
    pub fn unmap_point(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.dx) / self.scale,
            (point.y - self.dy) / self.scale,
        )
    }

    /// Bounding rectangle of the four mapped corners
    pub fn map_rect(&self, rect: &Rect) -> Result<Rect, GeometryError> {
        if !rect.is_valid() {
            return Err(GeometryError::DegenerateRect(*rect));
        }

        let corners = rect.corners().map(|corner| self.map_point(corner));

        Rect::bounding(&corners).ok_or(GeometryError::DegenerateRect(*rect))
    }
}

/// Map a single sensor-space rectangle into display space
pub fn transform(
    source_rect: &Rect,
    source_size: ImageSize,
    rotation_degrees: i32,
    dest_size: ImageSize,
) -> Result<Rect, GeometryError> {
    ViewTransform::new(source_size, rotation_degrees, dest_size)?.map_rect(source_rect)
}

fn swaps_axes(rotation_degrees: i32) -> bool {
    matches!(rotation_degrees.rem_euclid(360), 90 | 270)
}
