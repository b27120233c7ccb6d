use async_trait::async_trait;
use course_core::model::{Course, CourseId, Enrollment, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a course before the backend assigns its id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCourseRecord {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub level: Option<String>,
    pub instructor: Option<String>,
    pub video_url: Option<String>,
}

impl NewCourseRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Build the domain course once an id is known.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the record fails domain validation.
    pub fn into_course(self, id: CourseId) -> Result<Course, StorageError> {
        Course::new(id, self.name, self.description)
            .map(|course| {
                course
                    .with_category(self.category)
                    .with_level(self.level)
                    .with_instructor(self.instructor)
                    .with_video_url(self.video_url)
            })
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Repository contract for the course catalog.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a course and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn insert_new_course(&self, course: NewCourseRecord) -> Result<CourseId, StorageError>;

    /// Fetch a course by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure; a missing course is `Ok(None)`.
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError>;

    /// Replace every field of an existing course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no course has `id`.
    async fn update_course(
        &self,
        id: CourseId,
        course: NewCourseRecord,
    ) -> Result<Course, StorageError>;

    /// Remove a course and every enrollment in it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no course has `id`.
    async fn delete_course(&self, id: CourseId) -> Result<(), StorageError>;

    /// All courses ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError>;

    /// Number of stored courses.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn count_courses(&self) -> Result<u64, StorageError>;
}

/// Repository contract for enrollments, keyed by `(user, course)`.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Fetch the enrollment for a user and course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure; a missing row is `Ok(None)`.
    async fn get_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, StorageError>;

    /// Create an enrollment. Never overwrites an existing row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the pair is already enrolled.
    async fn insert_enrollment(&self, enrollment: &Enrollment) -> Result<(), StorageError>;

    /// Persist progress, status and `updated_at` of an existing enrollment.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row matches the pair.
    async fn update_progress(&self, enrollment: &Enrollment) -> Result<(), StorageError>;

    /// All enrollments of a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn list_enrollments(&self, user_id: UserId) -> Result<Vec<Enrollment>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    enrollments: Arc<Mutex<HashMap<(UserId, CourseId), Enrollment>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn insert_new_course(&self, course: NewCourseRecord) -> Result<CourseId, StorageError> {
        let mut guard = self.courses.lock().map_err(poisoned)?;
        let next = guard.keys().map(CourseId::value).max().unwrap_or(0) + 1;
        let id = CourseId::new(next);
        guard.insert(id, course.into_course(id)?);
        Ok(id)
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn update_course(
        &self,
        id: CourseId,
        course: NewCourseRecord,
    ) -> Result<Course, StorageError> {
        let mut guard = self.courses.lock().map_err(poisoned)?;
        let stored = guard.get_mut(&id).ok_or(StorageError::NotFound)?;
        *stored = course.into_course(id)?;
        Ok(stored.clone())
    }

    async fn delete_course(&self, id: CourseId) -> Result<(), StorageError> {
        let mut courses = self.courses.lock().map_err(poisoned)?;
        courses.remove(&id).ok_or(StorageError::NotFound)?;
        self.enrollments
            .lock()
            .map_err(poisoned)?
            .retain(|(_, course_id), _| *course_id != id);
        Ok(())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        let mut courses: Vec<Course> = guard.values().cloned().collect();
        courses.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Ok(courses)
    }

    async fn count_courses(&self) -> Result<u64, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        Ok(guard.len() as u64)
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryRepository {
    async fn get_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, StorageError> {
        let guard = self.enrollments.lock().map_err(poisoned)?;
        Ok(guard.get(&(user_id, course_id)).cloned())
    }

    async fn insert_enrollment(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        let known_course = self
            .courses
            .lock()
            .map_err(poisoned)?
            .contains_key(&enrollment.course_id());
        if !known_course {
            return Err(StorageError::NotFound);
        }
        let mut guard = self.enrollments.lock().map_err(poisoned)?;
        let key = (enrollment.user_id(), enrollment.course_id());
        if guard.contains_key(&key) {
            return Err(StorageError::Conflict);
        }
        guard.insert(key, enrollment.clone());
        Ok(())
    }

    async fn update_progress(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        let mut guard = self.enrollments.lock().map_err(poisoned)?;
        let stored = guard
            .get_mut(&(enrollment.user_id(), enrollment.course_id()))
            .ok_or(StorageError::NotFound)?;
        *stored = enrollment.clone();
        Ok(())
    }

    async fn list_enrollments(&self, user_id: UserId) -> Result<Vec<Enrollment>, StorageError> {
        let guard = self.enrollments.lock().map_err(poisoned)?;
        let mut found: Vec<Enrollment> = guard
            .values()
            .filter(|e| e.user_id() == user_id)
            .cloned()
            .collect();
        found.sort_by_key(|e| (e.enrolled_at(), e.course_id()));
        Ok(found)
    }
}

/// Aggregates course and enrollment repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let enrollments: Arc<dyn EnrollmentRepository> = Arc::new(repo);
        Self {
            courses,
            enrollments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::Progress;
    use course_core::time::fixed_now;

    async fn seeded() -> (InMemoryRepository, CourseId) {
        let repo = InMemoryRepository::new();
        let id = repo
            .insert_new_course(NewCourseRecord::new("Basic Computer Course", "Basics"))
            .await
            .unwrap();
        (repo, id)
    }

    #[tokio::test]
    async fn assigns_sequential_course_ids_and_lists_by_name() {
        let (repo, first) = seeded().await;
        let second = repo
            .insert_new_course(NewCourseRecord::new("Art Design Fundamentals", "Art"))
            .await
            .unwrap();
        assert_eq!(first, CourseId::new(1));
        assert_eq!(second, CourseId::new(2));

        let names: Vec<String> = repo
            .list_courses()
            .await
            .unwrap()
            .iter()
            .map(|c| c.name().to_owned())
            .collect();
        assert_eq!(names, ["Art Design Fundamentals", "Basic Computer Course"]);
        assert_eq!(repo.count_courses().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn second_insert_conflicts_and_keeps_first() {
        let (repo, course) = seeded().await;
        let user = UserId::new(7);
        let mut first = Enrollment::new(user, course, fixed_now());
        repo.insert_enrollment(&first).await.unwrap();
        first.apply_progress(Progress::new(40).unwrap(), fixed_now());
        repo.update_progress(&first).await.unwrap();

        let again = Enrollment::new(user, course, fixed_now());
        assert!(matches!(
            repo.insert_enrollment(&again).await,
            Err(StorageError::Conflict)
        ));
        let stored = repo.get_enrollment(user, course).await.unwrap().unwrap();
        assert_eq!(stored.progress(), Progress::new(40).unwrap());
    }

    #[tokio::test]
    async fn enrollment_requires_existing_course() {
        let repo = InMemoryRepository::new();
        let e = Enrollment::new(UserId::new(1), CourseId::new(99), fixed_now());
        assert!(matches!(
            repo.insert_enrollment(&e).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_replaces_fields_and_delete_drops_enrollments() {
        let (repo, course) = seeded().await;
        let mut record = NewCourseRecord::new("Basic Computer Course", "Basics, revised");
        record.video_url = Some("/uploads/basics.mp4".into());
        let updated = repo.update_course(course, record).await.unwrap();
        assert_eq!(updated.description(), "Basics, revised");
        assert_eq!(updated.video_url(), Some("/uploads/basics.mp4"));

        let user = UserId::new(2);
        repo.insert_enrollment(&Enrollment::new(user, course, fixed_now()))
            .await
            .unwrap();
        repo.delete_course(course).await.unwrap();
        assert!(repo.get_course(course).await.unwrap().is_none());
        assert!(repo.list_enrollments(user).await.unwrap().is_empty());

        assert!(matches!(
            repo.delete_course(course).await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            repo.update_course(course, NewCourseRecord::new("Gone", "")).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_without_row_is_not_found() {
        let (repo, course) = seeded().await;
        let e = Enrollment::new(UserId::new(1), course, fixed_now());
        assert!(matches!(
            repo.update_progress(&e).await,
            Err(StorageError::NotFound)
        ));
    }
}
