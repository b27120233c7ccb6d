use serde::{Deserialize, Serialize};

use crate::model::course::Course;
use crate::model::enrollment::Enrollment;
use crate::model::ids::CourseId;
use crate::model::progress::{EnrollmentStatus, Progress};

/// One enrolled course as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardEntry {
    pub id: CourseId,
    pub name: String,
    pub progress: Progress,
    pub status: EnrollmentStatus,
}

impl DashboardEntry {
    #[must_use]
    pub fn new(course: &Course, enrollment: &Enrollment) -> Self {
        Self {
            id: course.id(),
            name: course.name().to_owned(),
            progress: enrollment.progress(),
            status: enrollment.status(),
        }
    }
}

/// Per-user overview across all enrollments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub enrolled_courses: Vec<DashboardEntry>,
    pub overall_progress: f64,
    pub certificates_earned: usize,
}

impl DashboardSummary {
    /// Aggregate entries: mean progress (0 when empty) and earned certificates.
    #[must_use]
    pub fn from_entries(enrolled_courses: Vec<DashboardEntry>) -> Self {
        let certificates_earned = enrolled_courses
            .iter()
            .filter(|e| e.progress.earns_certificate())
            .count();
        let overall_progress = if enrolled_courses.is_empty() {
            0.0
        } else {
            let total: u32 = enrolled_courses
                .iter()
                .map(|e| u32::from(e.progress.value()))
                .sum();
            f64::from(total) / enrolled_courses.len() as f64
        };
        Self {
            enrolled_courses,
            overall_progress,
            certificates_earned,
        }
    }
}
