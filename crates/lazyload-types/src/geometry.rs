use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Scroll position of a scrollable box, in pixels from the document origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub top: f64,
    pub left: f64,
}

impl ScrollOffset {
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// Per-axis maximum. Hosts report scrolling on either the document root or
    /// the body depending on rendering mode, the other one stays at zero.
    pub fn max(self, other: Self) -> Self {
        Self {
            top: self.top.max(other.top),
            left: self.left.max(other.left),
        }
    }
}

/// Box of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub offset: Point,
    pub size: Size,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            offset: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn left(&self) -> f64 {
        self.offset.x
    }

    pub fn top(&self) -> f64 {
        self.offset.y
    }
}

/// Viewport size and scroll offsets measured at one point in time.
///
/// Every visibility test in a sweep is judged against the same snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometrySnapshot {
    pub viewport: Size,
    pub scroll: ScrollOffset,
}

impl GeometrySnapshot {
    pub const fn new(viewport: Size, scroll: ScrollOffset) -> Self {
        Self { viewport, scroll }
    }

    /// Bounding-box intersection against `[0, width] x [0, height]` after
    /// removing the scroll offsets. Both comparisons are inclusive, so a box
    /// touching an edge (even a zero-sized one) counts as visible.
    pub fn is_visible(&self, bounds: &Bounds) -> bool {
        let left = bounds.left() - self.scroll.left;
        let top = bounds.top() - self.scroll.top;

        let x_visible = left + bounds.size.width >= 0.0 && left <= self.viewport.width;
        let y_visible = top + bounds.size.height >= 0.0 && top <= self.viewport.height;

        x_visible && y_visible
    }
}
