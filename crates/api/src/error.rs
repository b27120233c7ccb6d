use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use services::error::{CatalogServiceError, DashboardServiceError, ProgressServiceError};
use services::wire::MessageBody;

pub(crate) const INVALID_COURSE: &str = "Invalid course data.";

/// Failures surfaced to HTTP clients as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required.")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error.")]
    Internal,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn course_not_found() -> Self {
        Self::NotFound(ProgressServiceError::CourseNotFound.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(MessageBody {
            message: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

impl From<ProgressServiceError> for ApiError {
    fn from(e: ProgressServiceError) -> Self {
        match e {
            ProgressServiceError::NotEnrolled => Self::Forbidden(e.to_string()),
            ProgressServiceError::InvalidInput(_) | ProgressServiceError::AlreadyEnrolled => {
                Self::BadRequest(e.to_string())
            }
            ProgressServiceError::NotFound | ProgressServiceError::CourseNotFound => {
                Self::NotFound(e.to_string())
            }
            other => {
                tracing::error!(error = %other, "progress store failure");
                Self::Internal
            }
        }
    }
}

impl From<CatalogServiceError> for ApiError {
    fn from(e: CatalogServiceError) -> Self {
        match e {
            CatalogServiceError::MissingName => Self::BadRequest(e.to_string()),
            CatalogServiceError::Course(_) => Self::BadRequest(INVALID_COURSE.to_owned()),
            CatalogServiceError::CourseNotFound => Self::NotFound(e.to_string()),
            other => {
                tracing::error!(error = %other, "catalog failure");
                Self::Internal
            }
        }
    }
}

impl From<DashboardServiceError> for ApiError {
    fn from(e: DashboardServiceError) -> Self {
        tracing::error!(error = %e, "dashboard failure");
        Self::Internal
    }
}
