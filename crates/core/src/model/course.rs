use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, StepId};
use crate::model::video::VideoSource;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course name cannot be empty")]
    EmptyName,

    #[error("step title cannot be empty")]
    EmptyStepTitle,

    #[error("step ids must be dense and 1-based: expected {expected}, found {found}")]
    NonDenseSteps { expected: StepId, found: StepId },

    #[error("too many steps in a single course")]
    TooManySteps,
}

//
// ─── STEP ──────────────────────────────────────────────────────────────────────
//

/// A single lesson inside a course. Immutable once the course is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    id: StepId,
    title: String,
    description: String,
    video: VideoSource,
}

impl Step {
    /// # Errors
    ///
    /// Returns `CourseError::EmptyStepTitle` for a blank title.
    pub fn new(
        id: StepId,
        title: impl Into<String>,
        description: impl Into<String>,
        video_url: &str,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyStepTitle);
        }
        Ok(Self {
            id,
            title,
            description: description.into(),
            video: VideoSource::classify(video_url),
        })
    }

    #[must_use]
    pub fn id(&self) -> StepId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn video(&self) -> &VideoSource {
        &self.video
    }
}

/// Check that step ids run 1, 2, 3, … in order.
///
/// # Errors
///
/// Returns `CourseError::NonDenseSteps` at the first gap or reordering.
pub fn validate_step_order(steps: &[Step]) -> Result<(), CourseError> {
    for (index, step) in steps.iter().enumerate() {
        let expected = StepId::from_index(index).ok_or(CourseError::TooManySteps)?;
        if step.id != expected {
            return Err(CourseError::NonDenseSteps {
                expected,
                found: step.id,
            });
        }
    }
    Ok(())
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// Catalog entry for a course.
///
/// Steps are not stored here; they are resolved through the step catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    name: String,
    description: String,
    category: Option<String>,
    level: Option<String>,
    instructor: Option<String>,
    video_url: Option<String>,
}

impl Course {
    /// # Errors
    ///
    /// Returns `CourseError::EmptyName` for a blank name.
    pub fn new(
        id: CourseId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, CourseError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CourseError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            description: description.into(),
            category: None,
            level: None,
            instructor: None,
            video_url: None,
        })
    }

    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = non_blank(category);
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Option<String>) -> Self {
        self.level = non_blank(level);
        self
    }

    #[must_use]
    pub fn with_instructor(mut self, instructor: Option<String>) -> Self {
        self.instructor = non_blank(instructor);
        self
    }

    /// Set the course-level video. When present it replaces any authored steps.
    #[must_use]
    pub fn with_video_url(mut self, video_url: Option<String>) -> Self {
        self.video_url = non_blank(video_url);
        self
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }

    #[must_use]
    pub fn instructor(&self) -> Option<&str> {
        self.instructor.as_deref()
    }

    #[must_use]
    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
