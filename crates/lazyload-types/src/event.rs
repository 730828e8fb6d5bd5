use serde::{Deserialize, Serialize};
use std::fmt;

/// Page events that can trigger a sweep of the pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageEvent {
    Scroll,
    Resize,
}

impl PageEvent {
    pub const ALL: &'static [Self] = &[Self::Scroll, Self::Resize];
}

impl fmt::Display for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageEvent::Scroll => write!(f, "scroll"),
            PageEvent::Resize => write!(f, "resize"),
        }
    }
}

/// Where a registered element's image is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JobState {
    #[default]
    Queued,
    Loading,
    Loaded,
    Failed(String),
}

impl JobState {
    pub fn is_queued(&self) -> bool {
        matches!(self, JobState::Queued)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, JobState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, JobState::Loaded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, JobState::Failed(_))
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, JobState::Loaded | JobState::Failed(_))
    }

    pub fn failed_source(&self) -> Option<&str> {
        match self {
            JobState::Failed(src) => Some(src),
            _ => None,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Queued => write!(f, "Queued"),
            JobState::Loading => write!(f, "Loading"),
            JobState::Loaded => write!(f, "Loaded"),
            JobState::Failed(src) => write!(f, "Failed: {}", src),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Promoted,
    LoadComplete,
    LoadError(String),
}

impl JobEvent {
    /// A settled job never goes back to loading: each job gets one attempt.
    pub fn apply_to_state(self, current_state: JobState) -> JobState {
        match (self, current_state) {
            (_, state @ (JobState::Loaded | JobState::Failed(_))) => state,
            (JobEvent::Promoted, _) => JobState::Loading,
            (JobEvent::LoadComplete, _) => JobState::Loaded,
            (JobEvent::LoadError(src), _) => JobState::Failed(src),
        }
    }
}
