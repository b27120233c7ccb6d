use course_core::model::{
    Course, CourseId, Enrollment, EnrollmentStatus, Progress, UserId,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{NewCourseRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Maps a driver error, turning constraint violations into domain conflicts.
pub(crate) fn db_err(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
        if db.is_foreign_key_violation() {
            return StorageError::NotFound;
        }
    }
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn course_id_from_i64(v: i64) -> Result<CourseId, StorageError> {
    Ok(CourseId::new(i64_to_u64("course_id", v)?))
}

pub(crate) fn user_id_from_i64(v: i64) -> Result<UserId, StorageError> {
    Ok(UserId::new(i64_to_u64("user_id", v)?))
}

/// Row key for a course id. Ids above `i64::MAX` were never assigned by
/// `SQLite`, so callers treat `None` as "no such row".
pub(crate) fn stored_course_id(id: CourseId) -> Option<i64> {
    i64::try_from(id.value()).ok()
}

/// Row key for a user id; `None` means the user cannot own any row.
pub(crate) fn stored_user_id(id: UserId) -> Option<i64> {
    i64::try_from(id.value()).ok()
}

pub(crate) fn user_id_to_i64(id: UserId) -> Result<i64, StorageError> {
    u64_to_i64("user_id", id.value())
}

pub(crate) fn map_course_row(row: &SqliteRow) -> Result<Course, StorageError> {
    let id = course_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    NewCourseRecord {
        name: row.try_get("name").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        category: row.try_get("category").map_err(ser)?,
        level: row.try_get("level").map_err(ser)?,
        instructor: row.try_get("instructor").map_err(ser)?,
        video_url: row.try_get("video_url").map_err(ser)?,
    }
    .into_course(id)
}

pub(crate) fn map_enrollment_row(row: &SqliteRow) -> Result<Enrollment, StorageError> {
    let progress = Progress::new(row.try_get::<i64, _>("progress").map_err(ser)?).map_err(ser)?;
    let status_raw: String = row.try_get("status").map_err(ser)?;
    let status = EnrollmentStatus::parse(&status_raw)
        .ok_or_else(|| StorageError::Serialization(format!("invalid status: {status_raw}")))?;

    Enrollment::from_persisted(
        user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?,
        course_id_from_i64(row.try_get::<i64, _>("course_id").map_err(ser)?)?,
        progress,
        status,
        row.try_get("enrolled_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}
