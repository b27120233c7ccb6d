use std::collections::HashMap;

use crate::model::course::{Course, CourseError, Step, validate_step_order};
use crate::model::ids::{CourseId, StepId};

/// Authored step definition: `(title, description, video url)`.
type StepEntry = (&'static str, &'static str, &'static str);

const GRAPHIC_DESIGN: [StepEntry; 5] = [
    (
        "Introduction to Graphic Design",
        "Learn the fundamentals of graphic design and its importance in modern communication.",
        "https://www.youtube.com/embed/ViOZmtLvbXI",
    ),
    (
        "Typography Basics",
        "Explore the art and technique of arranging type to make written language legible and appealing.",
        "https://www.youtube.com/embed/QrNi9FmdlxY",
    ),
    (
        "Color Theory Essentials",
        "Understanding color relationships and how to use them effectively in design.",
        "https://www.youtube.com/embed/Co6b_v8M_S8",
    ),
    (
        "Layout & Composition",
        "Master the principles of visual hierarchy and composition in design.",
        "https://www.youtube.com/embed/a5KYl8J-9sE",
    ),
    (
        "Getting Started with Canva",
        "Learn to use Canva for creating professional designs quickly and easily.",
        "https://www.youtube.com/embed/CFwF6YqT1K0",
    ),
];

const BASIC_COMPUTER: [StepEntry; 5] = [
    (
        "What is a Computer?",
        "Understanding what computers are and their basic components.",
        "https://www.youtube.com/embed/AkFi90lZmXA",
    ),
    (
        "Basic Hardware Components",
        "Learn about the physical parts that make up a computer system.",
        "https://www.youtube.com/embed/ExxFxD4OSZ0",
    ),
    (
        "Introduction to Windows",
        "Learn the basics of using Windows operating system.",
        "https://www.youtube.com/embed/w3fSBdleR0E",
    ),
    (
        "File Management Basics",
        "How to organize and manage your files and folders effectively.",
        "https://www.youtube.com/embed/k-EID5_2D9U",
    ),
    (
        "Internet Safety Basics",
        "Learn essential internet safety and security practices.",
        "https://www.youtube.com/embed/sdpxddDzXfE",
    ),
];

const ART_DESIGN: [StepEntry; 5] = [
    (
        "Elements of Art",
        "Learn the basic building blocks of artistic creation.",
        "https://www.youtube.com/embed/0SowNTA1FWw",
    ),
    (
        "Art Design Principles",
        "Understanding how to use the elements of art effectively.",
        "https://www.youtube.com/embed/bS1YQIphnEY",
    ),
    (
        "Color Theory for Artists",
        "Master the use of color in artistic compositions.",
        "https://www.youtube.com/embed/mUi7gKbF4HE",
    ),
    (
        "Drawing Basics",
        "Learn fundamental drawing techniques and practices.",
        "https://www.youtube.com/embed/ewMksAbgdBI",
    ),
    (
        "Digital Art Introduction",
        "Introduction to creating art using digital tools.",
        "https://www.youtube.com/embed/8RC5D7nu-YQ",
    ),
];

/// Courses inserted into an empty catalog: `(name, description)`.
pub const DEFAULT_COURSES: [(&str, &str); 3] = [
    (
        "Graphic Design Learning Path",
        "A comprehensive guide to becoming a graphic designer.",
    ),
    (
        "Basic Computer Course",
        "Learn the fundamentals of computer operation, hardware, and software.",
    ),
    (
        "Art Design Fundamentals",
        "Explore principles of art, including color theory and composition.",
    ),
];

/// Read-only lesson steps keyed by course id.
#[derive(Debug, Clone, Default)]
pub struct StepCatalog {
    steps: HashMap<CourseId, Vec<Step>>,
}

impl StepCatalog {
    /// An empty catalog; every course resolves to its video or to no steps.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in lessons for the three seeded courses.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if a built-in step fails validation.
    pub fn builtin() -> Result<Self, CourseError> {
        let mut catalog = Self::empty();
        for (id, entries) in [(1, &GRAPHIC_DESIGN), (2, &BASIC_COMPUTER), (3, &ART_DESIGN)] {
            let steps = entries
                .iter()
                .enumerate()
                .map(|(index, (title, description, url))| {
                    let step_id = StepId::from_index(index).ok_or(CourseError::TooManySteps)?;
                    Step::new(step_id, *title, *description, url)
                })
                .collect::<Result<Vec<_>, _>>()?;
            catalog.insert(CourseId::new(id), steps)?;
        }
        Ok(catalog)
    }

    /// Register authored steps for a course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::NonDenseSteps` if ids are not 1, 2, 3, ….
    pub fn insert(&mut self, course_id: CourseId, steps: Vec<Step>) -> Result<(), CourseError> {
        validate_step_order(&steps)?;
        self.steps.insert(course_id, steps);
        Ok(())
    }

    /// Resolve the ordered steps of a course.
    ///
    /// A course-level video is promoted to a single synthetic step and takes
    /// precedence over authored steps. Without either, the course has no steps.
    #[must_use]
    pub fn steps_for(&self, course: &Course) -> Vec<Step> {
        if let Some(url) = course.video_url() {
            let title = course.name();
            let step = Step::new(StepId::new(1), title, course.description(), url);
            if let Ok(step) = step {
                return vec![step];
            }
        }
        self.steps.get(&course.id()).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::video::VideoSource;

    fn course(id: u64) -> Course {
        Course::new(CourseId::new(id), "Graphic Design Learning Path", "Design basics").unwrap()
    }

    #[test]
    fn builtin_has_five_steps_per_seeded_course() {
        let catalog = StepCatalog::builtin().unwrap();
        for id in 1..=3 {
            let steps = catalog.steps_for(&course(id));
            assert_eq!(steps.len(), 5, "course {id}");
            assert!(steps.iter().all(|s| s.video().hosted_id().is_some()));
        }
    }

    #[test]
    fn course_video_is_promoted_to_single_step() {
        let catalog = StepCatalog::builtin().unwrap();
        let course = course(1).with_video_url(Some("/uploads/intro.mp4".into()));
        let steps = catalog.steps_for(&course);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].id(), StepId::new(1));
        assert_eq!(steps[0].title(), "Graphic Design Learning Path");
        assert_eq!(steps[0].description(), "Design basics");
        assert!(matches!(steps[0].video(), VideoSource::Uploaded { .. }));
    }

    #[test]
    fn unknown_course_has_no_steps() {
        let catalog = StepCatalog::builtin().unwrap();
        assert!(catalog.steps_for(&course(42)).is_empty());
    }

    #[test]
    fn insert_rejects_sparse_ids() {
        let mut catalog = StepCatalog::empty();
        let step = Step::new(StepId::new(2), "Only", "", "x").unwrap();
        assert!(catalog.insert(CourseId::new(9), vec![step]).is_err());
    }
}
