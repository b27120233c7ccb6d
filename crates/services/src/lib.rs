#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod controller;
pub mod dashboard_service;
pub mod error;
pub mod progress_service;
pub mod wire;

pub use course_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::{CatalogService, CourseFilter, ensure_seed_courses};
pub use controller::{
    HttpProgressSync, LocalProgressSync, ProgressAck, ProgressSync, StepProgressController,
};
pub use dashboard_service::DashboardService;
pub use error::{
    AppServicesError, CatalogServiceError, ControllerError, DashboardServiceError,
    ProgressServiceError, SyncError,
};
pub use progress_service::ProgressService;
pub use wire::CourseDetails;
