pub mod error;
pub mod geometry;
pub mod layout;
pub mod preprocess;
pub mod tap;
pub mod tracker;
pub mod transform;

pub use error::GeometryError;
pub use geometry::{box_similar, point_in_rect, smooth, text_similarity};
pub use layout::{Placed, resolve_overlaps};
pub use tap::route;
pub use tracker::{BoxTracker, ClearTicket, TrackerConfig, TrackerState, TrackerUpdate};
pub use transform::{ViewTransform, transform};
