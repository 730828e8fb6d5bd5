use crate::page::Page;
use lazyload_types::GeometrySnapshot;

/// Measures the page right now.
pub fn measure<P: Page + ?Sized>(page: &P) -> GeometrySnapshot {
    GeometrySnapshot::new(page.viewport(), page.root_scroll().max(page.body_scroll()))
}

/// Holds the most recent geometry measurement of a page.
#[derive(Debug, Clone, Default)]
pub struct GeometryTracker {
    current: Option<GeometrySnapshot>,
}

impl GeometryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<GeometrySnapshot> {
        self.current
    }

    /// Re-measures the page and overwrites the stored snapshot.
    pub fn update_bounds<P: Page + ?Sized>(&mut self, page: &P) -> GeometrySnapshot {
        let snapshot = measure(page);
        self.current = Some(snapshot);
        snapshot
    }

    /// Returns the stored snapshot, measuring only if none exists yet.
    pub fn ensure<P: Page + ?Sized>(&mut self, page: &P) -> GeometrySnapshot {
        match self.current {
            Some(snapshot) => snapshot,
            None => self.update_bounds(page),
        }
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
