//! Shared error types for the services crate.

use thiserror::Error;

use course_core::model::{CourseError, ProgressError, StepId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::controller::StepState;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("You are not enrolled in this course.")]
    NotEnrolled,
    #[error("Invalid progress value.")]
    InvalidInput(#[from] ProgressError),
    #[error("Enrollment not found.")]
    NotFound,
    #[error("Course not found.")]
    CourseNotFound,
    #[error("You are already enrolled in this course.")]
    AlreadyEnrolled,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService` and catalog seeding.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogServiceError {
    #[error("Course name required.")]
    MissingName,
    #[error("Course not found.")]
    CourseNotFound,
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by progress synchronization clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error(transparent)]
    Service(#[from] ProgressServiceError),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Errors emitted by `StepProgressController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ControllerError {
    #[error("course has no steps")]
    NoSteps,
    #[error("step {0} does not exist in this course")]
    UnknownStep(StepId),
    #[error("step index {index} is out of range for {total} steps")]
    StepOutOfRange { index: usize, total: usize },
    #[error("step {step} cannot be completed while {state:?}")]
    NotReady { step: StepId, state: StepState },
    #[error("certificate requires at least 80% progress")]
    CertificateLocked,
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error("seeding courses failed: {0}")]
    Seed(#[from] CatalogServiceError),
    #[error(transparent)]
    Course(#[from] CourseError),
}
