use lens_types::Rect;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("invalid geometry: source image is {width}x{height}")]
    EmptySource { width: u32, height: u32 },

    #[error("invalid geometry: destination is {width}x{height}")]
    EmptyDestination { width: u32, height: u32 },

    #[error("invalid geometry: degenerate rectangle {0:?}")]
    DegenerateRect(Rect),
}
