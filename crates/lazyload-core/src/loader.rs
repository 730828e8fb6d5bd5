use crate::error::FetchError;
use crate::job::Job;
use crate::page::PageElement;
use lazyload_types::ImageInfo;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tokio::task::{self, JoinHandle};
use tokio::time::Instant;
use tracing::{debug, warn};

pub type FetchFuture = Pin<Box<dyn Future<Output = Result<ImageInfo, FetchError>>>>;

/// What a fetcher hands back when asked for a source.
pub enum Fetch {
    /// The fetcher already holds the image; the load completes synchronously.
    Resident(ImageInfo),
    /// The image arrives later, or fails.
    Pending(FetchFuture),
}

impl Fetch {
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<ImageInfo, FetchError>> + 'static,
    {
        Self::Pending(Box::pin(future))
    }

    /// A failure reported on a later turn, never synchronously.
    pub fn failed(error: FetchError) -> Self {
        Self::pending(std::future::ready(Err(error)))
    }

    pub fn is_resident(&self) -> bool {
        matches!(self, Fetch::Resident(_))
    }
}

impl std::fmt::Debug for Fetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fetch::Resident(info) => f.debug_tuple("Resident").field(info).finish(),
            Fetch::Pending(_) => f.write_str("Pending"),
        }
    }
}

pub trait ImageFetcher {
    /// Starts fetching `src`. Called once per job.
    fn fetch(&self, src: &str) -> Fetch;
}

impl<T: ImageFetcher + ?Sized> ImageFetcher for Rc<T> {
    fn fetch(&self, src: &str) -> Fetch {
        (**self).fetch(src)
    }
}

/// How a load was carried out.
#[derive(Debug)]
pub enum Load {
    /// The success callback already ran.
    Completed,
    /// A local task will run one of the callbacks when the fetch finishes.
    InFlight(JoinHandle<()>),
}

impl Load {
    pub fn is_completed(&self) -> bool {
        matches!(self, Load::Completed)
    }
}

/// Loads the image for `job`, invoking exactly one of its callbacks exactly
/// once.
///
/// The asynchronous path spawns onto the current [`tokio::task::LocalSet`], so
/// this must be called from inside one.
pub fn load<E, F>(job: Job<E>, fetcher: &F) -> Load
where
    E: PageElement,
    F: ImageFetcher + ?Sized,
{
    let start = Instant::now();

    match fetcher.fetch(job.src()) {
        Fetch::Resident(info) => {
            debug!(
                "Resident image {} ({}x{}), loading synchronously",
                job.src(),
                info.width,
                info.height
            );
            job.succeed(start.elapsed());
            Load::Completed
        }
        Fetch::Pending(pending) => {
            let handle = task::spawn_local(async move {
                match pending.await {
                    Ok(info) => {
                        debug!(
                            "Loaded {} ({}x{}) in {}ms",
                            job.src(),
                            info.width,
                            info.height,
                            start.elapsed().as_millis()
                        );
                        job.succeed(start.elapsed());
                    }
                    Err(err) => {
                        warn!("Failed to load {}: {}", job.src(), err);
                        job.fail(start.elapsed());
                    }
                }
            });
            Load::InFlight(handle)
        }
    }
}
