use course_core::model::{Course, CourseId};

use super::SqliteRepository;
use super::mapping::{course_id_from_i64, db_err, map_course_row, ser, stored_course_id};
use crate::repository::{CourseRepository, NewCourseRecord, StorageError};

const COURSE_COLUMNS: &str = "id, name, description, category, level, instructor, video_url";

#[async_trait::async_trait]
impl CourseRepository for SqliteRepository {
    async fn insert_new_course(&self, course: NewCourseRecord) -> Result<CourseId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO courses (name, description, category, level, instructor, video_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(course.name)
        .bind(course.description)
        .bind(course.category)
        .bind(course.level)
        .bind(course.instructor)
        .bind(course.video_url)
        .execute(self.pool())
        .await
        .map_err(db_err)?;

        course_id_from_i64(res.last_insert_rowid())
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError> {
        let Some(key) = stored_course_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?1"))
            .bind(key)
            .fetch_optional(self.pool())
            .await
            .map_err(db_err)?;

        row.as_ref().map(map_course_row).transpose()
    }

    async fn update_course(
        &self,
        id: CourseId,
        course: NewCourseRecord,
    ) -> Result<Course, StorageError> {
        let key = stored_course_id(id).ok_or(StorageError::NotFound)?;
        let updated = course.clone().into_course(id)?;
        let res = sqlx::query(
            r"
            UPDATE courses
            SET name = ?1, description = ?2, category = ?3, level = ?4,
                instructor = ?5, video_url = ?6
            WHERE id = ?7
            ",
        )
        .bind(course.name)
        .bind(course.description)
        .bind(course.category)
        .bind(course.level)
        .bind(course.instructor)
        .bind(course.video_url)
        .bind(key)
        .execute(self.pool())
        .await
        .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(updated)
    }

    async fn delete_course(&self, id: CourseId) -> Result<(), StorageError> {
        let key = stored_course_id(id).ok_or(StorageError::NotFound)?;
        let mut tx = self.pool().begin().await.map_err(db_err)?;
        sqlx::query("DELETE FROM enrollments WHERE course_id = ?1")
            .bind(key)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        let res = sqlx::query("DELETE FROM courses WHERE id = ?1")
            .bind(key)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY name ASC, id ASC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(db_err)?;

        rows.iter().map(map_course_row).collect()
    }

    async fn count_courses(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(self.pool())
            .await
            .map_err(db_err)?;
        u64::try_from(count).map_err(ser)
    }
}
