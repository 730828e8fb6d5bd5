//! Viewport-driven lazy image loading.
//!
//! A [`LazyLoader`] measures a [`Page`], loads the images of registered
//! elements that are already on screen, and queues the rest until a scroll or
//! resize sweep finds them visible.

pub mod bounds;
pub mod error;
pub mod job;
pub mod loader;
pub mod page;
pub mod queue;
pub mod scheduler;

pub use bounds::{GeometryTracker, measure};
pub use error::{FetchError, FetchResult};
pub use job::{Job, LoadCallback, LoadOptions};
pub use loader::{Fetch, FetchFuture, ImageFetcher, Load, load};
pub use page::{Page, PageElement};
pub use queue::PendingQueue;
pub use scheduler::LazyLoader;
