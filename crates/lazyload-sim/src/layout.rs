use lazyload_types::{Bounds, Point};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum LayoutError {
    #[error("Cell size must be at least 16px")]
    CellTooSmall,

    #[error("Spacing cannot exceed cell size")]
    SpacingTooLarge,

    #[error("Container must fit at least one cell")]
    ContainerTooNarrow,

    #[error("Viewport height must be positive")]
    EmptyViewport,
}

/// Fixed-size grid of gallery tiles, laid out left to right then top to
/// bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub cell_size: f64,
    pub spacing: f64,
    pub container_width: f64,
    pub viewport_height: f64,
}

impl GridLayout {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            spacing: 8.0,
            container_width: 1280.0,
            viewport_height: 720.0,
        }
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_container_width(mut self, width: f64) -> Self {
        self.container_width = width;
        self
    }

    pub fn with_viewport_height(mut self, height: f64) -> Self {
        self.viewport_height = height;
        self
    }

    pub fn total_cell_size(&self) -> f64 {
        self.cell_size + self.spacing
    }

    /// Always at least one column, even when the container is too narrow.
    pub fn columns(&self) -> usize {
        if self.total_cell_size() <= 0.0 {
            return 1;
        }
        ((self.container_width / self.total_cell_size()).floor() as usize).max(1)
    }

    pub fn grid_dimensions(&self, total_items: usize) -> (usize, usize) {
        let cols = self.columns();
        (cols, total_items.div_ceil(cols))
    }

    pub fn cell_position(&self, index: usize) -> Point {
        let cols = self.columns();
        let row = index / cols;
        let col = index % cols;

        Point::new(
            col as f64 * self.total_cell_size(),
            row as f64 * self.total_cell_size(),
        )
    }

    pub fn cell_bounds(&self, index: usize) -> Bounds {
        let position = self.cell_position(index);
        Bounds::new(position.x, position.y, self.cell_size, self.cell_size)
    }

    pub fn document_height(&self, total_items: usize) -> f64 {
        let (_, rows) = self.grid_dimensions(total_items);
        rows as f64 * self.total_cell_size()
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.cell_size < 16.0 {
            return Err(LayoutError::CellTooSmall);
        }

        if self.spacing < 0.0 || self.spacing > self.cell_size {
            return Err(LayoutError::SpacingTooLarge);
        }

        if self.container_width < self.cell_size {
            return Err(LayoutError::ContainerTooNarrow);
        }

        if self.viewport_height <= 0.0 {
            return Err(LayoutError::EmptyViewport);
        }

        Ok(())
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(256.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout_creation() {
        let layout = GridLayout::default();
        assert_eq!(layout.cell_size, 256.0);
        assert_eq!(layout.spacing, 8.0);
        assert_eq!(layout.container_width, 1280.0);
        assert_eq!(layout.viewport_height, 720.0);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_grid_dimensions() {
        let layout = GridLayout::new(256.0).with_container_width(800.0);

        // 800 / (256 + 8) = 3 columns
        assert_eq!(layout.columns(), 3);

        // 10 items, 3 columns = 4 rows (3+3+3+1)
        assert_eq!(layout.grid_dimensions(10), (3, 4));
        assert_eq!(layout.grid_dimensions(0), (3, 0));
    }

    #[test]
    fn test_cell_position() {
        let layout = GridLayout::new(256.0).with_container_width(800.0);

        assert_eq!(layout.cell_position(0), Point::new(0.0, 0.0));
        assert_eq!(layout.cell_position(1), Point::new(264.0, 0.0));
        // Index 3 wraps to a new row
        assert_eq!(layout.cell_position(3), Point::new(0.0, 264.0));
        assert_eq!(layout.cell_bounds(4), Bounds::new(264.0, 264.0, 256.0, 256.0));
    }

    #[test]
    fn test_document_height() {
        let layout = GridLayout::new(256.0).with_container_width(800.0);
        assert_eq!(layout.document_height(10), 4.0 * 264.0);
        assert_eq!(layout.document_height(0), 0.0);
    }

    #[test]
    fn test_narrow_container_keeps_one_column() {
        let layout = GridLayout::new(256.0).with_container_width(100.0);
        assert_eq!(layout.columns(), 1);
        assert_eq!(layout.cell_position(2), Point::new(0.0, 528.0));
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            GridLayout::new(8.0).validate(),
            Err(LayoutError::CellTooSmall)
        );
        assert_eq!(
            GridLayout::new(64.0).with_spacing(100.0).validate(),
            Err(LayoutError::SpacingTooLarge)
        );
        assert_eq!(
            GridLayout::new(256.0).with_container_width(100.0).validate(),
            Err(LayoutError::ContainerTooNarrow)
        );
        assert_eq!(
            GridLayout::default().with_viewport_height(0.0).validate(),
            Err(LayoutError::EmptyViewport)
        );
    }
}
