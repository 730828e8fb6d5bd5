use lazyload_types::{Bounds, PageEvent, ScrollOffset, Size};

/// The host page the scheduler measures and subscribes to.
///
/// `listen` and `unlisten` only tell the host whether the scheduler wants page
/// events; the host forwards them through [`crate::LazyLoader::handle_event`].
pub trait Page {
    /// Rendered size of the window.
    fn viewport(&self) -> Size;

    /// Scroll offsets of the document root.
    fn root_scroll(&self) -> ScrollOffset;

    /// Scroll offsets of the body. Some rendering modes scroll this one
    /// instead of the root.
    fn body_scroll(&self) -> ScrollOffset;

    fn listen(&self, events: &[PageEvent]);

    fn unlisten(&self, events: &[PageEvent]);
}

/// Handle to an image-bearing element. Handles are cheap to clone and the
/// host owns the element behind them.
pub trait PageElement: Clone + 'static {
    /// Box in document coordinates.
    fn bounds(&self) -> Bounds;

    fn attribute(&self, name: &str) -> Option<String>;
}
