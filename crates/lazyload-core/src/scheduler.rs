use crate::bounds::GeometryTracker;
use crate::job::{Job, LoadOptions};
use crate::loader::{self, ImageFetcher, Load};
use crate::page::{Page, PageElement};
use crate::queue::PendingQueue;
use lazyload_config::{CallbackPolicy, LazyLoadConfig};
use lazyload_types::{GeometrySnapshot, PageEvent};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error};

struct State<E> {
    geometry: GeometryTracker,
    queue: PendingQueue<E>,
    listening: bool,
    in_flight: Vec<JoinHandle<()>>,
    // Kept apart from `in_flight`, which `settle` drains while it waits.
    aborts: Vec<AbortHandle>,
}

impl<E> Default for State<E> {
    fn default() -> Self {
        Self {
            geometry: GeometryTracker::default(),
            queue: PendingQueue::default(),
            listening: false,
            in_flight: Vec::new(),
            aborts: Vec::new(),
        }
    }
}

/// Defers image loads until their elements scroll into view.
///
/// Handles are cheap to clone and share one queue, so callbacks can keep a
/// handle and register more elements. The state is single-threaded; loads
/// that do not complete synchronously run on the current
/// [`tokio::task::LocalSet`].
pub struct LazyLoader<P, F, E> {
    page: Rc<P>,
    fetcher: Rc<F>,
    config: Rc<LazyLoadConfig>,
    state: Rc<RefCell<State<E>>>,
}

impl<P, F, E> Clone for LazyLoader<P, F, E> {
    fn clone(&self) -> Self {
        Self {
            page: self.page.clone(),
            fetcher: self.fetcher.clone(),
            config: self.config.clone(),
            state: self.state.clone(),
        }
    }
}

impl<P, F, E> LazyLoader<P, F, E>
where
    P: Page,
    F: ImageFetcher,
    E: PageElement,
{
    pub fn new(page: P, fetcher: F, config: LazyLoadConfig) -> Self {
        Self {
            page: Rc::new(page),
            fetcher: Rc::new(fetcher),
            config: Rc::new(config),
            state: Rc::new(RefCell::new(State::default())),
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn config(&self) -> &LazyLoadConfig {
        &self.config
    }

    /// Number of jobs waiting for their element to become visible.
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    pub fn is_listening(&self) -> bool {
        self.state.borrow().listening
    }

    pub fn snapshot(&self) -> Option<GeometrySnapshot> {
        self.state.borrow().geometry.current()
    }

    /// Number of asynchronous loads that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.state
            .borrow()
            .aborts
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Loads `element`'s image now if it is visible, otherwise queues it until
    /// a sweep finds it on screen. Returns the element for chaining.
    ///
    /// # Panics
    ///
    /// A visible element whose image is not resident starts a local task, so
    /// this panics when called outside a [`tokio::task::LocalSet`]. The same
    /// holds for [`LazyLoader::sweep`] and [`LazyLoader::handle_event`].
    pub fn register(&self, element: E, options: LoadOptions<E>) -> E {
        let job = Job::new(
            element.clone(),
            options,
            &self.config.src_attribute,
            self.config.callback_policy,
        );

        let visible = {
            let mut state = self.state.borrow_mut();
            let snapshot = state.geometry.ensure(&*self.page);
            snapshot.is_visible(&element.bounds())
        };

        if visible {
            debug!("{} is visible at registration, loading now", job.src());
            self.dispatch(job);
            return element;
        }

        let attach = {
            let mut state = self.state.borrow_mut();
            debug!("Queueing {} ({} pending)", job.src(), state.queue.len() + 1);
            state.queue.push(job);
            let attach = !state.listening;
            state.listening = true;
            attach
        };

        if attach {
            debug!("Listening for {:?}", self.config.events);
            self.page.listen(&self.config.events);
        }

        element
    }

    /// Re-measures the page and loads every queued job whose element is now
    /// visible. Stops listening once the queue is empty. Returns the number of
    /// jobs promoted.
    ///
    /// Queue and listener state are settled before any callback runs.
    pub fn sweep(&self) -> usize {
        let (ready, detach) = {
            let mut state = self.state.borrow_mut();
            let snapshot = state.geometry.update_bounds(&*self.page);
            let ready = state.queue.take_visible(&snapshot);
            let detach = state.listening && state.queue.is_empty();
            if detach {
                state.listening = false;
            }
            (ready, detach)
        };

        if detach {
            debug!("Queue drained, no longer listening");
            self.page.unlisten(&self.config.events);
        }

        let promoted = ready.len();
        if promoted > 0 {
            debug!("Sweep promoted {} job(s)", promoted);
        }

        for job in ready {
            self.dispatch(job);
        }

        promoted
    }

    /// Entry point for page events forwarded by the host.
    pub fn handle_event(&self, event: PageEvent) -> usize {
        if !self.config.listens_to(event) || !self.is_listening() {
            return 0;
        }
        self.sweep()
    }

    /// Stops listening, drops every queued job, aborts in-flight loads and
    /// forgets the measured geometry. Returns the number of queued jobs
    /// dropped. The loader can be used again afterwards.
    pub fn teardown(&self) -> usize {
        let (dropped, detach, aborts) = {
            let mut state = self.state.borrow_mut();
            let dropped = state.queue.drain();
            let detach = std::mem::take(&mut state.listening);
            state.geometry.reset();
            state.in_flight.clear();
            (dropped, detach, std::mem::take(&mut state.aborts))
        };

        // Also reaches loads whose join handles a running `settle` holds
        for handle in aborts {
            handle.abort();
        }

        if detach {
            self.page.unlisten(&self.config.events);
        }

        debug!("Torn down with {} job(s) still queued", dropped.len());
        dropped.len()
    }

    /// Waits for every in-flight load, including loads started by callbacks
    /// while waiting.
    pub async fn settle(&self) {
        loop {
            let handles = std::mem::take(&mut self.state.borrow_mut().in_flight);
            if handles.is_empty() {
                break;
            }

            for handle in handles {
                let Err(err) = handle.await else {
                    continue;
                };

                if !err.is_panic() {
                    continue;
                }

                match self.config.callback_policy {
                    CallbackPolicy::Propagate => std::panic::resume_unwind(err.into_panic()),
                    CallbackPolicy::Isolate => error!("A load task panicked: {}", err),
                }
            }
        }
    }

    fn dispatch(&self, job: Job<E>) {
        if let Load::InFlight(handle) = loader::load(job, &*self.fetcher) {
            let mut state = self.state.borrow_mut();
            state.in_flight.retain(|handle| !handle.is_finished());
            state.aborts.retain(|handle| !handle.is_finished());
            state.aborts.push(handle.abort_handle());
            state.in_flight.push(handle);
        }
    }
}
