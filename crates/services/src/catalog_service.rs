use std::sync::Arc;

use serde::Deserialize;

use course_core::model::{Course, CourseId, DEFAULT_COURSES};
use storage::repository::{CourseRepository, NewCourseRecord, StorageError};

use crate::error::CatalogServiceError;

/// Optional catalog filters. Blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CourseFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub instructor: Option<String>,
}

impl CourseFilter {
    /// Case-insensitive substring search over name and description; exact
    /// match on category, level and instructor.
    #[must_use]
    pub fn matches(&self, course: &Course) -> bool {
        let search_ok = given(&self.search).is_none_or(|needle| {
            let needle = needle.to_lowercase();
            course.name().to_lowercase().contains(&needle)
                || course.description().to_lowercase().contains(&needle)
        });
        search_ok
            && exact(given(&self.category), course.category())
            && exact(given(&self.level), course.level())
            && exact(given(&self.instructor), course.instructor())
    }
}

fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn exact(wanted: Option<&str>, actual: Option<&str>) -> bool {
    wanted.is_none_or(|w| actual == Some(w))
}

/// Course catalog listing and admin management.
#[derive(Clone)]
pub struct CatalogService {
    courses: Arc<dyn CourseRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Courses matching `filter`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Storage` if repository access fails.
    pub async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, CatalogServiceError> {
        let courses = self.courses.list_courses().await?;
        Ok(courses.into_iter().filter(|c| filter.matches(c)).collect())
    }

    /// Add a course to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::MissingName` for a blank name.
    pub async fn create_course(&self, record: NewCourseRecord) -> Result<Course, CatalogServiceError> {
        require_name(&record)?;
        let id = self.courses.insert_new_course(record.clone()).await?;
        let course = record.into_course(id)?;
        tracing::info!(course_id = %id, name = course.name(), "course created");
        Ok(course)
    }

    /// Replace every editable field of course `id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::CourseNotFound` if no course has `id`.
    pub async fn update_course(
        &self,
        id: CourseId,
        record: NewCourseRecord,
    ) -> Result<Course, CatalogServiceError> {
        require_name(&record)?;
        let course = self.courses.update_course(id, record).await.map_err(not_found)?;
        tracing::info!(course_id = %id, "course updated");
        Ok(course)
    }

    /// Remove course `id` together with its enrollments.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::CourseNotFound` if no course has `id`.
    pub async fn delete_course(&self, id: CourseId) -> Result<(), CatalogServiceError> {
        self.courses.delete_course(id).await.map_err(not_found)?;
        tracing::info!(course_id = %id, "course deleted");
        Ok(())
    }
}

fn require_name(record: &NewCourseRecord) -> Result<(), CatalogServiceError> {
    if record.name.trim().is_empty() {
        return Err(CatalogServiceError::MissingName);
    }
    Ok(())
}

fn not_found(e: StorageError) -> CatalogServiceError {
    match e {
        StorageError::NotFound => CatalogServiceError::CourseNotFound,
        other => CatalogServiceError::Storage(other),
    }
}

/// Insert the default courses when the catalog is empty.
///
/// Returns how many courses were inserted.
///
/// # Errors
///
/// Returns `CatalogServiceError` if counting or inserting fails.
pub async fn ensure_seed_courses(
    courses: &dyn CourseRepository,
) -> Result<usize, CatalogServiceError> {
    if courses.count_courses().await? > 0 {
        return Ok(0);
    }
    for (name, description) in DEFAULT_COURSES {
        courses
            .insert_new_course(NewCourseRecord::new(name, description))
            .await?;
    }
    tracing::info!(count = DEFAULT_COURSES.len(), "courses seeded");
    Ok(DEFAULT_COURSES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    async fn seeded() -> CatalogService {
        let repo = InMemoryRepository::new();
        ensure_seed_courses(&repo).await.unwrap();
        let mut record = NewCourseRecord::new("Photo Editing", "Retouching for beginners");
        record.category = Some("Design".into());
        record.level = Some("Beginner".into());
        repo.insert_new_course(record).await.unwrap();
        CatalogService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn seeding_only_fills_an_empty_catalog() {
        let repo = InMemoryRepository::new();
        assert_eq!(ensure_seed_courses(&repo).await.unwrap(), 3);
        assert_eq!(ensure_seed_courses(&repo).await.unwrap(), 0);
        assert_eq!(repo.count_courses().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn unfiltered_listing_is_ordered_by_name() {
        let svc = seeded().await;
        let names: Vec<String> = svc
            .list_courses(&CourseFilter::default())
            .await
            .unwrap()
            .iter()
            .map(|c| c.name().to_owned())
            .collect();
        assert_eq!(
            names,
            [
                "Art Design Fundamentals",
                "Basic Computer Course",
                "Graphic Design Learning Path",
                "Photo Editing"
            ]
        );
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_name_and_description() {
        let svc = seeded().await;
        let filter = CourseFilter {
            search: Some("DESIGN".into()),
            ..CourseFilter::default()
        };
        let found = svc.list_courses(&filter).await.unwrap();
        assert_eq!(found.len(), 2);

        let filter = CourseFilter {
            search: Some("retouching".into()),
            ..CourseFilter::default()
        };
        assert_eq!(svc.list_courses(&filter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn exact_filters_combine() {
        let svc = seeded().await;
        let filter = CourseFilter {
            category: Some("Design".into()),
            level: Some("Beginner".into()),
            instructor: Some("  ".into()),
            ..CourseFilter::default()
        };
        let found = svc.list_courses(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "Photo Editing");

        let filter = CourseFilter {
            level: Some("beginner".into()),
            ..CourseFilter::default()
        };
        assert!(svc.list_courses(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_name_is_rejected_on_create_and_update() {
        let svc = seeded().await;
        let err = svc.create_course(NewCourseRecord::new("  ", "x")).await.unwrap_err();
        assert!(matches!(err, CatalogServiceError::MissingName));

        let err = svc
            .update_course(CourseId::new(1), NewCourseRecord::new("", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogServiceError::MissingName));
    }

    #[tokio::test]
    async fn update_sets_video_url_and_missing_courses_are_reported() {
        let svc = seeded().await;
        let created = svc
            .create_course(NewCourseRecord::new("Pottery", "Wheel basics"))
            .await
            .unwrap();
        assert_eq!(created.video_url(), None);

        let mut record = NewCourseRecord::new("Pottery", "Wheel basics");
        record.video_url = Some("https://www.youtube.com/watch?v=abc123".into());
        let updated = svc.update_course(created.id(), record.clone()).await.unwrap();
        assert_eq!(updated.video_url(), Some("https://www.youtube.com/watch?v=abc123"));

        let missing = CourseId::new(999);
        assert!(matches!(
            svc.update_course(missing, record).await,
            Err(CatalogServiceError::CourseNotFound)
        ));
        assert!(matches!(
            svc.delete_course(missing).await,
            Err(CatalogServiceError::CourseNotFound)
        ));

        svc.delete_course(created.id()).await.unwrap();
        let names: Vec<String> = svc
            .list_courses(&CourseFilter::default())
            .await
            .unwrap()
            .iter()
            .map(|c| c.name().to_owned())
            .collect();
        assert!(!names.contains(&"Pottery".to_owned()));
    }
}
