use crate::job::Job;
use crate::page::PageElement;
use lazyload_types::GeometrySnapshot;

/// Jobs whose elements were off-screen when last tested, in registration
/// order.
#[derive(Debug)]
pub struct PendingQueue<E> {
    jobs: Vec<Job<E>>,
}

impl<E> Default for PendingQueue<E> {
    fn default() -> Self {
        Self { jobs: Vec::new() }
    }
}

impl<E: PageElement> PendingQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn push(&mut self, job: Job<E>) {
        self.jobs.push(job);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job<E>> {
        self.jobs.iter()
    }

    /// Removes every job visible in `snapshot` and returns them, last
    /// registered first.
    ///
    /// All indices are collected before anything is removed, and removal
    /// runs from the highest index down so no pending index shifts.
    pub fn take_visible(&mut self, snapshot: &GeometrySnapshot) -> Vec<Job<E>> {
        let visible: Vec<usize> = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, job)| snapshot.is_visible(&job.element().bounds()))
            .map(|(index, _)| index)
            .collect();

        visible
            .into_iter()
            .rev()
            .map(|index| self.jobs.remove(index))
            .collect()
    }

    pub fn drain(&mut self) -> Vec<Job<E>> {
        std::mem::take(&mut self.jobs)
    }
}
