#![allow(dead_code)]

use lazyload_core::{Fetch, FetchError, ImageFetcher, Page, PageElement};
use lazyload_types::{Bounds, ImageInfo, PageEvent, ScrollOffset, Size};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

/// Window with a scrollable root. Records listener transitions.
pub struct MockPage {
    viewport: Cell<Size>,
    root: Cell<ScrollOffset>,
    body: Cell<ScrollOffset>,
    listening: Cell<bool>,
    pub listens: Cell<usize>,
    pub unlistens: Cell<usize>,
}

impl MockPage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Cell::new(Size::new(width, height)),
            root: Cell::new(ScrollOffset::default()),
            body: Cell::new(ScrollOffset::default()),
            listening: Cell::new(false),
            listens: Cell::new(0),
            unlistens: Cell::new(0),
        }
    }

    pub fn scroll_to(&self, top: f64) {
        self.root.set(ScrollOffset::new(top, self.root.get().left));
    }

    pub fn scroll_body_to(&self, top: f64) {
        self.body.set(ScrollOffset::new(top, 0.0));
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.viewport.set(Size::new(width, height));
    }

    pub fn is_attached(&self) -> bool {
        self.listening.get()
    }
}

impl Page for MockPage {
    fn viewport(&self) -> Size {
        self.viewport.get()
    }

    fn root_scroll(&self) -> ScrollOffset {
        self.root.get()
    }

    fn body_scroll(&self) -> ScrollOffset {
        self.body.get()
    }

    fn listen(&self, events: &[PageEvent]) {
        assert!(!self.listening.get(), "listener attached twice");
        assert!(!events.is_empty());
        self.listening.set(true);
        self.listens.set(self.listens.get() + 1);
    }

    fn unlisten(&self, _events: &[PageEvent]) {
        assert!(self.listening.get(), "listener detached while not attached");
        self.listening.set(false);
        self.unlistens.set(self.unlistens.get() + 1);
    }
}

#[derive(Clone, Debug)]
pub struct MockImg {
    pub id: &'static str,
    bounds: Rc<Cell<Bounds>>,
    src: Option<String>,
}

impl MockImg {
    pub fn at(id: &'static str, y: f64, src: &str) -> Self {
        Self {
            id,
            bounds: Rc::new(Cell::new(Bounds::new(0.0, y, 200.0, 150.0))),
            src: Some(src.to_string()),
        }
    }

    pub fn without_src(id: &'static str, y: f64) -> Self {
        Self {
            id,
            bounds: Rc::new(Cell::new(Bounds::new(0.0, y, 200.0, 150.0))),
            src: None,
        }
    }

    pub fn move_to(&self, y: f64) {
        let bounds = self.bounds.get();
        self.bounds.set(Bounds::new(bounds.left(), y, bounds.size.width, bounds.size.height));
    }
}

impl PageElement for MockImg {
    fn bounds(&self) -> Bounds {
        self.bounds.get()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "src" => self.src.clone(),
            _ => None,
        }
    }
}

/// Resident sources complete synchronously, failing sources error after a
/// short delay, everything else succeeds after a short delay.
#[derive(Default)]
pub struct MockFetcher {
    resident: HashSet<String>,
    failing: HashSet<String>,
    pub requests: RefCell<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resident(mut self, src: &str) -> Self {
        self.resident.insert(src.to_string());
        self
    }

    pub fn with_failing(mut self, src: &str) -> Self {
        self.failing.insert(src.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ImageFetcher for MockFetcher {
    fn fetch(&self, src: &str) -> Fetch {
        self.requests.borrow_mut().push(src.to_string());

        if self.resident.contains(src) {
            return Fetch::Resident(ImageInfo::new(100, 100));
        }

        if src.is_empty() {
            return Fetch::failed(FetchError::EmptySource);
        }

        let fails = self.failing.contains(src);
        let src = src.to_string();
        Fetch::pending(async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            if fails {
                Err(FetchError::Io {
                    src,
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
            } else {
                Ok(ImageInfo::new(100, 100))
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(&'static str, String, Duration),
    Error(&'static str, String, Duration),
}

pub type OutcomeLog = Rc<RefCell<Vec<Outcome>>>;

pub fn recording_options(log: &OutcomeLog) -> lazyload_core::LoadOptions<MockImg> {
    let on_success = log.clone();
    let on_error = log.clone();
    lazyload_core::LoadOptions::new()
        .on_success(move |img: &MockImg, src, elapsed| {
            on_success
                .borrow_mut()
                .push(Outcome::Success(img.id, src.to_string(), elapsed))
        })
        .on_error(move |img: &MockImg, src, elapsed| {
            on_error
                .borrow_mut()
                .push(Outcome::Error(img.id, src.to_string(), elapsed))
        })
}
