use std::sync::Arc;

use course_core::model::{StepCatalog, UserId};
use storage::repository::Storage;

use crate::Clock;
use crate::catalog_service::{CatalogService, ensure_seed_courses};
use crate::controller::LocalProgressSync;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    catalog: Arc<CatalogService>,
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage, seeding an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or seeding fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::bootstrap(storage, clock).await
    }

    /// Build services over in-memory storage, seeded like a fresh database.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if seeding fails.
    pub async fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::bootstrap(Storage::in_memory(), clock).await
    }

    async fn bootstrap(storage: Storage, clock: Clock) -> Result<Self, AppServicesError> {
        ensure_seed_courses(storage.courses.as_ref()).await?;
        let catalog = Arc::new(StepCatalog::builtin()?);
        Ok(Self::from_storage(&storage, clock, catalog))
    }

    /// Wire services over existing storage without seeding.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, catalog: Arc<StepCatalog>) -> Self {
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&storage.courses),
            Arc::clone(&storage.enrollments),
            catalog,
        ));
        let catalog = Arc::new(CatalogService::new(Arc::clone(&storage.courses)));
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&storage.courses),
            Arc::clone(&storage.enrollments),
        ));
        Self {
            progress,
            catalog,
            dashboard,
        }
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    /// In-process progress sync for `user_id`.
    #[must_use]
    pub fn local_sync(&self, user_id: UserId) -> LocalProgressSync {
        LocalProgressSync::new(self.progress(), user_id)
    }
}
