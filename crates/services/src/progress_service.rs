use std::sync::Arc;

use course_core::model::{CourseId, Enrollment, Progress, StepCatalog, UserId};
use storage::repository::{CourseRepository, EnrollmentRepository, StorageError};

use crate::Clock;
use crate::error::ProgressServiceError;
use crate::wire::CourseDetails;

/// Server-side progress store: enrollments and their single progress value.
///
/// Writes are last-write-wins; concurrent sessions for one user are not
/// reconciled beyond that.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    catalog: Arc<StepCatalog>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        catalog: Arc<StepCatalog>,
    ) -> Self {
        Self {
            clock,
            courses,
            enrollments,
            catalog,
        }
    }

    /// Fetch the enrollment of `user_id` in `course_id`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::NotEnrolled` when no enrollment exists.
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn get_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Enrollment, ProgressServiceError> {
        self.enrollments
            .get_enrollment(user_id, course_id)
            .await?
            .ok_or(ProgressServiceError::NotEnrolled)
    }

    /// Overwrite the stored progress and recompute status.
    ///
    /// Writing the value already stored changes nothing, `updated_at` included.
    /// Lower values are accepted.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::InvalidInput` for a missing or out-of-range value.
    /// Returns `ProgressServiceError::NotFound` when no enrollment exists.
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn set_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
        raw: Option<i64>,
    ) -> Result<Enrollment, ProgressServiceError> {
        let progress = Progress::from_input(raw)?;
        let mut enrollment = self
            .enrollments
            .get_enrollment(user_id, course_id)
            .await?
            .ok_or(ProgressServiceError::NotFound)?;

        let previous = enrollment.progress();
        if !enrollment.apply_progress(progress, self.clock.now()) {
            tracing::debug!(%user_id, %course_id, %progress, "progress unchanged");
            return Ok(enrollment);
        }
        if progress < previous {
            tracing::info!(%user_id, %course_id, %previous, %progress, "progress regression accepted");
        }

        self.enrollments
            .update_progress(&enrollment)
            .await
            .map_err(|e| match e {
                StorageError::NotFound => ProgressServiceError::NotFound,
                other => ProgressServiceError::Storage(other),
            })?;
        tracing::info!(
            %user_id,
            %course_id,
            %progress,
            status = %enrollment.status(),
            "progress updated"
        );
        Ok(enrollment)
    }

    /// Enroll `user_id` in `course_id` at 0%. Never overwrites.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::CourseNotFound` if the course does not exist.
    /// Returns `ProgressServiceError::AlreadyEnrolled` if an enrollment exists.
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn enroll(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Enrollment, ProgressServiceError> {
        if self.courses.get_course(course_id).await?.is_none() {
            return Err(ProgressServiceError::CourseNotFound);
        }
        if self
            .enrollments
            .get_enrollment(user_id, course_id)
            .await?
            .is_some()
        {
            return Err(ProgressServiceError::AlreadyEnrolled);
        }

        let enrollment = Enrollment::new(user_id, course_id, self.clock.now());
        self.enrollments
            .insert_enrollment(&enrollment)
            .await
            .map_err(|e| match e {
                StorageError::Conflict => ProgressServiceError::AlreadyEnrolled,
                StorageError::NotFound => ProgressServiceError::CourseNotFound,
                other => ProgressServiceError::Storage(other),
            })?;
        tracing::info!(%user_id, %course_id, "enrollment created");
        Ok(enrollment)
    }

    /// Course, enrollment and resolved steps for the course page.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::CourseNotFound` if the course does not exist,
    /// then `ProgressServiceError::NotEnrolled` if the user is not enrolled.
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn course_details(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<CourseDetails, ProgressServiceError> {
        let course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(ProgressServiceError::CourseNotFound)?;
        let enrollment = self.get_enrollment(user_id, course_id).await?;
        let steps = self.catalog.steps_for(&course);
        Ok(CourseDetails {
            course,
            enrollment,
            steps,
        })
    }
}
