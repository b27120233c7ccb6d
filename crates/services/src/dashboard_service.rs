use std::sync::Arc;

use course_core::model::{DashboardEntry, DashboardSummary, UserId};
use storage::repository::{CourseRepository, EnrollmentRepository};

use crate::error::DashboardServiceError;

/// Builds the per-user learning overview.
#[derive(Clone)]
pub struct DashboardService {
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            courses,
            enrollments,
        }
    }

    /// Summarize every enrollment of `user_id`.
    ///
    /// Enrollments whose course has disappeared are skipped.
    ///
    /// # Errors
    ///
    /// Returns `DashboardServiceError::Storage` if repository access fails.
    pub async fn dashboard(&self, user_id: UserId) -> Result<DashboardSummary, DashboardServiceError> {
        let enrollments = self.enrollments.list_enrollments(user_id).await?;
        let mut entries = Vec::with_capacity(enrollments.len());
        for enrollment in &enrollments {
            match self.courses.get_course(enrollment.course_id()).await? {
                Some(course) => entries.push(DashboardEntry::new(&course, enrollment)),
                None => {
                    tracing::warn!(%user_id, course_id = %enrollment.course_id(), "enrollment without course");
                }
            }
        }
        Ok(DashboardSummary::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{Enrollment, Progress};
    use course_core::time::fixed_now;
    use storage::repository::{InMemoryRepository, NewCourseRecord};

    #[tokio::test]
    async fn summarizes_enrollments() {
        let repo = InMemoryRepository::new();
        let user = UserId::new(5);
        for (name, progress) in [("Art Design Fundamentals", 90), ("Basic Computer Course", 30)] {
            let course = repo
                .insert_new_course(NewCourseRecord::new(name, ""))
                .await
                .unwrap();
            let mut e = Enrollment::new(user, course, fixed_now());
            repo.insert_enrollment(&e).await.unwrap();
            e.apply_progress(Progress::new(progress).unwrap(), fixed_now());
            repo.update_progress(&e).await.unwrap();
        }

        let svc = DashboardService::new(Arc::new(repo.clone()), Arc::new(repo));
        let summary = svc.dashboard(user).await.unwrap();
        assert_eq!(summary.enrolled_courses.len(), 2);
        assert_eq!(summary.certificates_earned, 1);
        assert!((summary.overall_progress - 60.0).abs() < f64::EPSILON);

        let empty = svc.dashboard(UserId::new(6)).await.unwrap();
        assert!(empty.enrolled_courses.is_empty());
        assert_eq!(empty.overall_progress, 0.0);
    }
}
