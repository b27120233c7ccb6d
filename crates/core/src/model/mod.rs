mod catalog;
mod certificate;
mod course;
mod dashboard;
mod enrollment;
mod ids;
mod progress;
mod video;

pub use ids::{CourseId, ParseIdError, StepId, UserId};

pub use catalog::{DEFAULT_COURSES, StepCatalog};
pub use certificate::{Certificate, DEFAULT_RECIPIENT};
pub use course::{Course, CourseError, Step, validate_step_order};
pub use dashboard::{DashboardEntry, DashboardSummary};
pub use enrollment::{Enrollment, EnrollmentError};
pub use progress::{COMPLETION_THRESHOLD, EnrollmentStatus, Progress, ProgressError};
pub use video::{VideoSource, hosted_video_id};
