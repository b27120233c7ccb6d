use std::sync::Arc;

use course_core::model::{Certificate, Course, CourseId, Progress, Step, StepId};

use super::affordance::{StepState, StepView};
use super::playback::{PlaybackEvent, PlaybackPlan};
use super::session::CourseSession;
use super::sync::{ProgressAck, ProgressSync};
use crate::Clock;
use crate::error::ControllerError;

/// Drives one course page: step affordances, watch gating, and progress pushes.
///
/// Completion takes `&mut self`, so a controller never has two pushes in flight.
pub struct StepProgressController {
    sync: Arc<dyn ProgressSync>,
    clock: Clock,
    course: Course,
    session: CourseSession,
    recipient: Option<String>,
}

impl StepProgressController {
    /// Fetch the course page and derive the session from the stored progress.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Sync` if the details cannot be loaded.
    pub async fn load(
        sync: Arc<dyn ProgressSync>,
        course_id: CourseId,
        clock: Clock,
    ) -> Result<Self, ControllerError> {
        let details = sync.fetch_details(course_id).await?;
        let session = CourseSession::new(
            details.course.id(),
            details.steps,
            details.enrollment.progress(),
        );
        tracing::debug!(
            %course_id,
            total = session.total_steps(),
            completed = session.completed_steps(),
            "course session loaded"
        );
        Ok(Self {
            sync,
            clock,
            course: details.course,
            session,
            recipient: None,
        })
    }

    /// Name printed on certificates.
    #[must_use]
    pub fn with_recipient(mut self, recipient: Option<String>) -> Self {
        self.recipient = recipient;
        self
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    #[must_use]
    pub fn session(&self) -> &CourseSession {
        &self.session
    }

    #[must_use]
    pub fn step_views(&self) -> Vec<StepView> {
        self.session.step_views()
    }

    #[must_use]
    pub fn state_of(&self, step: StepId) -> Option<StepState> {
        self.session.state_of(step)
    }

    /// Progress as last acknowledged by the store.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.session.acknowledged_progress()
    }

    #[must_use]
    pub fn certificate_visible(&self) -> bool {
        self.progress().earns_certificate()
    }

    /// Issue the printable certificate, dated today.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::CertificateLocked` below the completion threshold.
    pub fn certificate(&self) -> Result<Certificate, ControllerError> {
        if !self.certificate_visible() {
            return Err(ControllerError::CertificateLocked);
        }
        Ok(Certificate::new(
            self.recipient.as_deref(),
            self.course.name(),
            self.clock.today(),
        ))
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.session.current_step()
    }

    #[must_use]
    pub fn playback_plan(&self, step: StepId) -> Option<PlaybackPlan> {
        self.session
            .steps()
            .get(step.index())
            .map(|s| PlaybackPlan::for_source(s.video()))
    }

    /// # Errors
    ///
    /// Returns `ControllerError::StepOutOfRange` past the last step.
    pub fn go_to(&mut self, index: usize) -> Result<&Step, ControllerError> {
        self.session.go_to(index)
    }

    pub fn next(&mut self) -> bool {
        self.session.next()
    }

    pub fn previous(&mut self) -> bool {
        self.session.previous()
    }

    /// Feed a playback event for `step`.
    ///
    /// Returns the new state when an ended event unlocks completion. Events for
    /// locked or completed steps are ignored.
    pub fn on_playback(&mut self, step: StepId, event: impl Into<PlaybackEvent>) -> Option<StepState> {
        if !event.into().is_ended() {
            return None;
        }
        if self.session.mark_watched(step) {
            tracing::debug!(course_id = %self.session.course_id(), %step, "step ready");
            return Some(StepState::Ready);
        }
        None
    }

    /// Complete a ready step: apply locally, push, then confirm or roll back.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NoSteps` for an empty course, `NotReady` unless
    /// the step is ready, and `Sync` when the push fails; in that case the step
    /// is ready again and navigation is unchanged.
    pub async fn mark_complete(&mut self, step: StepId) -> Result<ProgressAck, ControllerError> {
        let tentative = self.session.apply_tentative(step)?;
        let course_id = self.session.course_id();
        match self.sync.push_progress(course_id, tentative.progress()).await {
            Ok(ack) => {
                tracing::info!(%course_id, %step, progress = %ack.progress, "step completed");
                self.session.confirm(tentative, ack.progress);
                Ok(ack)
            }
            Err(err) => {
                tracing::warn!(%course_id, %step, error = %err, "completion rolled back");
                self.session.revert(tentative);
                Err(err.into())
            }
        }
    }
}
