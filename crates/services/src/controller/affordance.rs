use serde::Serialize;

use course_core::model::{Step, StepId};

/// Completion affordance of one step, derived from the session counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    /// Past the next step to complete.
    Locked,
    /// The next step, waiting for its video to end.
    WatchRequired,
    /// The next step, video watched; completion is allowed.
    Ready,
    Completed,
}

impl StepState {
    /// Derive the state of the step at `index`.
    #[must_use]
    pub fn derive(index: usize, completed_steps: usize, watched: bool) -> Self {
        match index.cmp(&completed_steps) {
            std::cmp::Ordering::Less => Self::Completed,
            std::cmp::Ordering::Greater => Self::Locked,
            std::cmp::Ordering::Equal if watched => Self::Ready,
            std::cmp::Ordering::Equal => Self::WatchRequired,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Locked => "Future step",
            Self::WatchRequired => "Watch Video to Enable",
            Self::Ready => "Mark as Complete",
            Self::Completed => "Completed!",
        }
    }

    /// Only a ready step accepts a completion request.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Presentation view of a step and its affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub id: StepId,
    pub title: String,
    pub state: StepState,
    pub label: &'static str,
    pub enabled: bool,
    pub current: bool,
}

impl StepView {
    #[must_use]
    pub fn new(step: &Step, state: StepState, current: bool) -> Self {
        Self {
            id: step.id(),
            title: step.title().to_owned(),
            state,
            label: state.label(),
            enabled: state.is_enabled(),
            current,
        }
    }
}
