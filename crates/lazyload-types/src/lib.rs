pub mod event;
pub mod geometry;

pub use event::{JobEvent, JobState, PageEvent};
pub use geometry::{Bounds, GeometrySnapshot, Point, ScrollOffset, Size};

/// Dimensions reported by a fetcher once an image is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
