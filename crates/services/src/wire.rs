//! JSON bodies exchanged between the HTTP API and its clients.

use serde::{Deserialize, Serialize};

use course_core::model::{Course, CourseId, Enrollment, EnrollmentStatus, Progress, Step};
use storage::repository::NewCourseRecord;

/// `POST /api/course/{id}/progress` request. A missing field is kept as `None`
/// so validation can report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    #[serde(default)]
    pub progress: Option<i64>,
}

/// Successful progress write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdated {
    pub message: String,
    pub progress: Progress,
    pub status: EnrollmentStatus,
}

/// Successful enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentCreated {
    pub message: String,
    pub enrollment: Enrollment,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Course page payload: the course, the caller's enrollment and resolved steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDetails {
    pub course: Course,
    pub enrollment: Enrollment,
    pub steps: Vec<Step>,
}

/// Admin create/replace body. `videoUrl` is a link; file uploads are not accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    pub level: Option<String>,
    pub instructor: Option<String>,
    #[serde(alias = "video_url")]
    pub video_url: Option<String>,
}

impl From<CourseInput> for NewCourseRecord {
    fn from(input: CourseInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            category: input.category,
            level: input.level,
            instructor: input.instructor,
            video_url: input.video_url,
        }
    }
}

/// Successful admin create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCreated {
    pub id: CourseId,
    pub message: String,
}

pub const PROGRESS_UPDATED: &str = "Progress updated successfully.";
pub const ENROLLED: &str = "Successfully enrolled!";
pub const COURSE_CREATED: &str = "Course created.";
pub const COURSE_UPDATED: &str = "Course updated.";
pub const COURSE_DELETED: &str = "Course deleted.";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn progress_update_keeps_missing_value_for_validation() {
        let update: ProgressUpdate = serde_json::from_value(json!({})).unwrap();
        assert_eq!(update.progress, None);
        assert!(serde_json::from_value::<ProgressUpdate>(json!({ "progress": 12.5 })).is_err());
    }

    #[test]
    fn course_input_accepts_camel_and_snake_video_url() {
        let camel: CourseInput =
            serde_json::from_value(json!({ "name": "Pottery", "videoUrl": "/uploads/a.mp4" }))
                .unwrap();
        let snake: CourseInput =
            serde_json::from_value(json!({ "name": "Pottery", "video_url": "/uploads/a.mp4" }))
                .unwrap();
        assert_eq!(camel, snake);
        let record = NewCourseRecord::from(camel);
        assert_eq!(record.video_url.as_deref(), Some("/uploads/a.mp4"));
        assert_eq!(record.description, "");
    }

    #[test]
    fn progress_updated_body_shape() {
        let body = ProgressUpdated {
            message: PROGRESS_UPDATED.to_owned(),
            progress: Progress::new(80).unwrap(),
            status: EnrollmentStatus::Completed,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "message": "Progress updated successfully.",
                "progress": 80,
                "status": "Completed"
            })
        );
    }
}
