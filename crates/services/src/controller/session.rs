use std::collections::HashSet;

use course_core::model::{CourseId, Progress, Step, StepId};

use super::affordance::{StepState, StepView};
use crate::error::ControllerError;

/// Per-course client session state.
///
/// `completed_steps` is derived from the acknowledged progress on load and
/// afterwards only moves through [`TentativeCompletion`]. Navigation is kept
/// apart from completion.
#[derive(Debug, Clone)]
pub struct CourseSession {
    course_id: CourseId,
    steps: Vec<Step>,
    completed_steps: usize,
    current_step_index: usize,
    acknowledged: Progress,
    watched: HashSet<StepId>,
}

/// A completion applied locally but not yet acknowledged by the store.
///
/// Consumed by [`CourseSession::confirm`] or [`CourseSession::revert`].
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct TentativeCompletion {
    step: StepId,
    previous_completed: usize,
    progress: Progress,
}

impl TentativeCompletion {
    #[must_use]
    pub fn step(&self) -> StepId {
        self.step
    }

    /// Percentage to push to the store.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }
}

impl CourseSession {
    #[must_use]
    pub fn new(course_id: CourseId, steps: Vec<Step>, acknowledged: Progress) -> Self {
        let completed_steps = acknowledged.completed_steps(steps.len());
        Self {
            course_id,
            steps,
            completed_steps,
            current_step_index: 0,
            acknowledged,
            watched: HashSet::new(),
        }
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn completed_steps(&self) -> usize {
        self.completed_steps
    }

    #[must_use]
    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current_step_index)
    }

    /// Last progress value the store acknowledged.
    #[must_use]
    pub fn acknowledged_progress(&self) -> Progress {
        self.acknowledged
    }

    /// Percentage implied by the local completed-step count.
    ///
    /// Differs from the acknowledged value when the stored percentage does not
    /// fall on a step boundary.
    #[must_use]
    pub fn step_progress(&self) -> Progress {
        Progress::from_completed_steps(self.completed_steps, self.steps.len())
            .unwrap_or(Progress::ZERO)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.steps.is_empty() && self.completed_steps >= self.steps.len()
    }

    /// Affordance of a step, or `None` if the id is not part of the course.
    #[must_use]
    pub fn state_of(&self, step: StepId) -> Option<StepState> {
        let index = step.index();
        self.steps
            .get(index)
            .filter(|s| s.id() == step)
            .map(|_| StepState::derive(index, self.completed_steps, self.watched.contains(&step)))
    }

    #[must_use]
    pub fn step_views(&self) -> Vec<StepView> {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let state = StepState::derive(
                    index,
                    self.completed_steps,
                    self.watched.contains(&step.id()),
                );
                StepView::new(step, state, index == self.current_step_index)
            })
            .collect()
    }

    /// Record a playback-ended signal. Returns `true` if the step became ready.
    pub(crate) fn mark_watched(&mut self, step: StepId) -> bool {
        if self.state_of(step) != Some(StepState::WatchRequired) {
            return false;
        }
        self.watched.insert(step)
    }

    /// Move the navigation cursor.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::StepOutOfRange` past the last step.
    pub fn go_to(&mut self, index: usize) -> Result<&Step, ControllerError> {
        let total = self.steps.len();
        let step = self
            .steps
            .get(index)
            .ok_or(ControllerError::StepOutOfRange { index, total })?;
        self.current_step_index = index;
        Ok(step)
    }

    /// Advance the cursor; returns `false` at the last step.
    pub fn next(&mut self) -> bool {
        if self.current_step_index + 1 >= self.steps.len() {
            return false;
        }
        self.current_step_index += 1;
        true
    }

    /// Step the cursor back; returns `false` at the first step.
    pub fn previous(&mut self) -> bool {
        if self.current_step_index == 0 {
            return false;
        }
        self.current_step_index -= 1;
        true
    }

    /// Locally complete the ready step.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoSteps` for an empty course,
    /// `UnknownStep` for a foreign id, and `NotReady` unless the step is ready.
    pub(crate) fn apply_tentative(
        &mut self,
        step: StepId,
    ) -> Result<TentativeCompletion, ControllerError> {
        let total = self.steps.len();
        if total == 0 {
            return Err(ControllerError::NoSteps);
        }
        let state = self.state_of(step).ok_or(ControllerError::UnknownStep(step))?;
        if state != StepState::Ready {
            return Err(ControllerError::NotReady { step, state });
        }
        let previous_completed = self.completed_steps;
        self.completed_steps = (previous_completed + 1).min(total);
        let progress =
            Progress::from_completed_steps(self.completed_steps, total).unwrap_or(Progress::FULL);
        Ok(TentativeCompletion {
            step,
            previous_completed,
            progress,
        })
    }

    /// Keep the tentative completion and record the store's value.
    pub(crate) fn confirm(&mut self, tentative: TentativeCompletion, acknowledged: Progress) {
        debug_assert!(self.completed_steps > tentative.previous_completed);
        self.acknowledged = acknowledged;
    }

    /// Undo the tentative completion. The step stays watched, so it is ready again.
    pub(crate) fn revert(&mut self, tentative: TentativeCompletion) {
        self.completed_steps = tentative.previous_completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(n: u32) -> Vec<Step> {
        (1..=n)
            .map(|id| {
                Step::new(StepId::new(id), format!("Step {id}"), "", "https://youtu.be/AkFi90lZmXA")
                    .unwrap()
            })
            .collect()
    }

    fn session(total: u32, progress: i64) -> CourseSession {
        CourseSession::new(CourseId::new(1), steps(total), Progress::new(progress).unwrap())
    }

    #[test]
    fn derives_completed_steps_by_floor() {
        let s = session(5, 45);
        assert_eq!(s.completed_steps(), 2);
        assert_eq!(s.step_progress(), Progress::new(40).unwrap());
        assert_eq!(s.acknowledged_progress(), Progress::new(45).unwrap());
    }

    #[test]
    fn states_follow_completed_count() {
        let mut s = session(5, 40);
        assert_eq!(s.state_of(StepId::new(1)), Some(StepState::Completed));
        assert_eq!(s.state_of(StepId::new(3)), Some(StepState::WatchRequired));
        assert_eq!(s.state_of(StepId::new(4)), Some(StepState::Locked));
        assert_eq!(s.state_of(StepId::new(6)), None);

        assert!(!s.mark_watched(StepId::new(4)));
        assert!(s.mark_watched(StepId::new(3)));
        assert_eq!(s.state_of(StepId::new(3)), Some(StepState::Ready));
    }

    #[test]
    fn tentative_completion_confirms_or_reverts() {
        let mut s = session(5, 40);
        s.mark_watched(StepId::new(3));

        let t = s.apply_tentative(StepId::new(3)).unwrap();
        assert_eq!(t.progress(), Progress::new(60).unwrap());
        assert_eq!(s.completed_steps(), 3);
        s.revert(t);
        assert_eq!(s.completed_steps(), 2);
        assert_eq!(s.state_of(StepId::new(3)), Some(StepState::Ready));

        let t = s.apply_tentative(StepId::new(3)).unwrap();
        s.confirm(t, Progress::new(60).unwrap());
        assert_eq!(s.completed_steps(), 3);
        assert_eq!(s.acknowledged_progress(), Progress::new(60).unwrap());
        assert_eq!(s.state_of(StepId::new(4)), Some(StepState::WatchRequired));
    }

    #[test]
    fn empty_course_never_completes() {
        let mut s = session(0, 100);
        assert_eq!(s.completed_steps(), 0);
        assert_eq!(s.step_progress(), Progress::ZERO);
        assert!(!s.is_finished());
        assert!(matches!(
            s.apply_tentative(StepId::new(1)),
            Err(ControllerError::NoSteps)
        ));
    }

    #[test]
    fn navigation_is_bounded_and_independent_of_completion() {
        let mut s = session(3, 0);
        assert!(!s.previous());
        assert!(s.next());
        assert!(s.next());
        assert!(!s.next());
        assert_eq!(s.current_step_index(), 2);
        assert_eq!(s.completed_steps(), 0);
        assert!(matches!(
            s.go_to(3),
            Err(ControllerError::StepOutOfRange { index: 3, total: 3 })
        ));
        assert_eq!(s.go_to(0).unwrap().id(), StepId::new(1));
    }
}
