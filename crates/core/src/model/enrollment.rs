use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, UserId};
use crate::model::progress::{EnrollmentStatus, Progress};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnrollmentError {
    #[error("stored status {stored} does not match progress {progress}")]
    StatusMismatch {
        stored: EnrollmentStatus,
        progress: Progress,
    },

    #[error("updated_at is before enrolled_at")]
    InvalidTimeRange,
}

/// Binding between a user and a course, carrying the single persisted progress value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    user_id: UserId,
    course_id: CourseId,
    progress: Progress,
    status: EnrollmentStatus,
    enrolled_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Enrollment {
    /// A fresh enrollment at 0%.
    #[must_use]
    pub fn new(user_id: UserId, course_id: CourseId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            course_id,
            progress: Progress::ZERO,
            status: EnrollmentStatus::InProgress,
            enrolled_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate an enrollment from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentError::StatusMismatch` if the stored status disagrees
    /// with the stored progress, or `InvalidTimeRange` for inverted timestamps.
    pub fn from_persisted(
        user_id: UserId,
        course_id: CourseId,
        progress: Progress,
        status: EnrollmentStatus,
        enrolled_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, EnrollmentError> {
        if status != EnrollmentStatus::from_progress(progress) {
            return Err(EnrollmentError::StatusMismatch {
                stored: status,
                progress,
            });
        }
        if updated_at < enrolled_at {
            return Err(EnrollmentError::InvalidTimeRange);
        }
        Ok(Self {
            user_id,
            course_id,
            progress,
            status,
            enrolled_at,
            updated_at,
        })
    }

    /// Overwrite progress and recompute status.
    ///
    /// Regressions are accepted. Returns `false` (and leaves the enrollment
    /// untouched, timestamps included) when the value is already stored.
    pub fn apply_progress(&mut self, progress: Progress, now: DateTime<Utc>) -> bool {
        if self.progress == progress {
            return false;
        }
        self.progress = progress;
        self.status = EnrollmentStatus::from_progress(progress);
        self.updated_at = now.max(self.enrolled_at);
        true
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[must_use]
    pub fn status(&self) -> EnrollmentStatus {
        self.status
    }

    #[must_use]
    pub fn enrolled_at(&self) -> DateTime<Utc> {
        self.enrolled_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
