#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    CourseRepository, EnrollmentRepository, InMemoryRepository, NewCourseRecord, Storage,
    StorageError,
};
