use lazyload_core::{Page, PageElement};
use lazyload_types::{Bounds, JobEvent, JobState, PageEvent, ScrollOffset, Size};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

/// Headless window over a scrolling gallery document.
#[derive(Debug)]
pub struct GalleryPage {
    viewport: Cell<Size>,
    scroll: Cell<ScrollOffset>,
    listening: Cell<bool>,
}

impl GalleryPage {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport: Cell::new(viewport),
            scroll: Cell::new(ScrollOffset::default()),
            listening: Cell::new(false),
        }
    }

    pub fn scroll_to(&self, top: f64) {
        self.scroll.set(ScrollOffset::new(top.max(0.0), 0.0));
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll.get().top
    }

    pub fn resize(&self, viewport: Size) {
        self.viewport.set(viewport);
    }

    pub fn is_listening(&self) -> bool {
        self.listening.get()
    }
}

impl Page for GalleryPage {
    fn viewport(&self) -> Size {
        self.viewport.get()
    }

    fn root_scroll(&self) -> ScrollOffset {
        self.scroll.get()
    }

    fn body_scroll(&self) -> ScrollOffset {
        ScrollOffset::default()
    }

    fn listen(&self, events: &[PageEvent]) {
        debug!("Gallery listening for {:?}", events);
        self.listening.set(true);
    }

    fn unlisten(&self, events: &[PageEvent]) {
        debug!("Gallery stopped listening for {:?}", events);
        self.listening.set(false);
    }
}

#[derive(Debug)]
struct TileInner {
    index: usize,
    src: String,
    bounds: Cell<Bounds>,
    state: RefCell<JobState>,
}

/// One thumbnail slot in the gallery.
#[derive(Debug, Clone)]
pub struct Tile {
    inner: Rc<TileInner>,
}

impl Tile {
    pub fn new(index: usize, src: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            inner: Rc::new(TileInner {
                index,
                src: src.into(),
                bounds: Cell::new(bounds),
                state: RefCell::new(JobState::Queued),
            }),
        }
    }

    pub fn index(&self) -> usize {
        self.inner.index
    }

    pub fn src(&self) -> &str {
        &self.inner.src
    }

    pub fn state(&self) -> JobState {
        self.inner.state.borrow().clone()
    }

    pub fn apply(&self, event: JobEvent) {
        let current = self.inner.state.take();
        *self.inner.state.borrow_mut() = event.apply_to_state(current);
    }

    pub fn relayout(&self, bounds: Bounds) {
        self.inner.bounds.set(bounds);
    }
}

impl PageElement for Tile {
    fn bounds(&self) -> Bounds {
        self.inner.bounds.get()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        (name == "src").then(|| self.inner.src.clone())
    }
}
