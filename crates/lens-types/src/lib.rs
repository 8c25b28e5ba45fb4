pub mod geometry;
pub mod types;

pub use geometry::{ImageSize, Point, Rect};
pub use types::*;
