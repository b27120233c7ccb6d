use course_core::model::{CourseId, Enrollment, UserId};

use super::SqliteRepository;
use super::mapping::{
    db_err, map_enrollment_row, stored_course_id, stored_user_id, user_id_to_i64,
};
use crate::repository::{EnrollmentRepository, StorageError};

#[async_trait::async_trait]
impl EnrollmentRepository for SqliteRepository {
    async fn get_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, StorageError> {
        let (Some(user_key), Some(course_key)) = (stored_user_id(user_id), stored_course_id(course_id))
        else {
            return Ok(None);
        };
        let row = sqlx::query(
            r"
            SELECT user_id, course_id, progress, status, enrolled_at, updated_at
            FROM enrollments
            WHERE user_id = ?1 AND course_id = ?2
            ",
        )
        .bind(user_key)
        .bind(course_key)
        .fetch_optional(self.pool())
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_enrollment_row).transpose()
    }

    async fn insert_enrollment(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        let course_key = stored_course_id(enrollment.course_id()).ok_or(StorageError::NotFound)?;
        sqlx::query(
            r"
            INSERT INTO enrollments (user_id, course_id, progress, status, enrolled_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(user_id_to_i64(enrollment.user_id())?)
        .bind(course_key)
        .bind(i64::from(enrollment.progress()))
        .bind(enrollment.status().as_str())
        .bind(enrollment.enrolled_at())
        .bind(enrollment.updated_at())
        .execute(self.pool())
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update_progress(&self, enrollment: &Enrollment) -> Result<(), StorageError> {
        let (Some(user_key), Some(course_key)) = (
            stored_user_id(enrollment.user_id()),
            stored_course_id(enrollment.course_id()),
        ) else {
            return Err(StorageError::NotFound);
        };
        let res = sqlx::query(
            r"
            UPDATE enrollments
            SET progress = ?1, status = ?2, updated_at = ?3
            WHERE user_id = ?4 AND course_id = ?5
            ",
        )
        .bind(i64::from(enrollment.progress()))
        .bind(enrollment.status().as_str())
        .bind(enrollment.updated_at())
        .bind(user_key)
        .bind(course_key)
        .execute(self.pool())
        .await
        .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn list_enrollments(&self, user_id: UserId) -> Result<Vec<Enrollment>, StorageError> {
        let Some(user_key) = stored_user_id(user_id) else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query(
            r"
            SELECT user_id, course_id, progress, status, enrolled_at, updated_at
            FROM enrollments
            WHERE user_id = ?1
            ORDER BY enrolled_at ASC, course_id ASC
            ",
        )
        .bind(user_key)
        .fetch_all(self.pool())
        .await
        .map_err(db_err)?;

        rows.iter().map(map_enrollment_row).collect()
    }
}
