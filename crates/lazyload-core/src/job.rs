use crate::page::PageElement;
use lazyload_config::CallbackPolicy;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Duration;
use tracing::error;

/// Completion callback: the element, the source that was fetched and the time
/// since the load started.
pub type LoadCallback<E> = Rc<dyn Fn(&E, &str, Duration)>;

/// Caller overrides for one registration. Anything left unset falls back to
/// the element's source attribute and no-op callbacks.
pub struct LoadOptions<E> {
    src: Option<String>,
    on_success: Option<LoadCallback<E>>,
    on_error: Option<LoadCallback<E>>,
}

impl<E> LoadOptions<E> {
    pub fn new() -> Self {
        Self {
            src: None,
            on_success: None,
            on_error: None,
        }
    }

    pub fn src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&E, &str, Duration) + 'static,
    {
        self.on_success = Some(Rc::new(callback));
        self
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&E, &str, Duration) + 'static,
    {
        self.on_error = Some(Rc::new(callback));
        self
    }
}

impl<E> Default for LoadOptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for LoadOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("src", &self.src)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

fn noop<E>() -> LoadCallback<E> {
    Rc::new(|_: &E, _: &str, _: Duration| {})
}

/// One pending or in-flight load request.
pub struct Job<E> {
    element: E,
    src: String,
    on_success: LoadCallback<E>,
    on_error: LoadCallback<E>,
    policy: CallbackPolicy,
}

impl<E: PageElement> Job<E> {
    pub fn new(
        element: E,
        options: LoadOptions<E>,
        src_attribute: &str,
        policy: CallbackPolicy,
    ) -> Self {
        let src = options
            .src
            .or_else(|| element.attribute(src_attribute))
            .unwrap_or_default();

        Self {
            element,
            src,
            on_success: options.on_success.unwrap_or_else(noop),
            on_error: options.on_error.unwrap_or_else(noop),
            policy,
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub(crate) fn succeed(&self, elapsed: Duration) {
        self.invoke(&self.on_success, "success", elapsed);
    }

    pub(crate) fn fail(&self, elapsed: Duration) {
        self.invoke(&self.on_error, "error", elapsed);
    }

    fn invoke(&self, callback: &LoadCallback<E>, kind: &str, elapsed: Duration) {
        match self.policy {
            CallbackPolicy::Propagate => callback(&self.element, self.src.as_str(), elapsed),
            CallbackPolicy::Isolate => {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    callback(&self.element, self.src.as_str(), elapsed)
                }));

                if let Err(payload) = result {
                    error!(
                        "The {} callback for {} panicked: {}",
                        kind,
                        self.src,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
    }
}

impl<E> fmt::Debug for Job<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("src", &self.src)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
