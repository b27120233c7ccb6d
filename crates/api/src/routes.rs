use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use course_core::model::{Course, CourseId, DashboardSummary, ProgressError};
use services::CourseFilter;
use services::error::ProgressServiceError;
use services::wire::{
    COURSE_CREATED, COURSE_DELETED, COURSE_UPDATED, CourseCreated, CourseDetails, CourseInput,
    ENROLLED, EnrollmentCreated, MessageBody, PROGRESS_UPDATED, ProgressUpdate, ProgressUpdated,
};

use crate::auth::{AdminUser, AuthUser};
use crate::error::{ApiError, INVALID_COURSE};
use crate::state::ApiState;

fn course_id(path: Result<Path<CourseId>, PathRejection>) -> Result<CourseId, ApiError> {
    path.map(|Path(id)| id).map_err(|e| {
        tracing::debug!(error = %e, "unparsable course id");
        ApiError::course_not_found()
    })
}

fn course_input(body: Result<Json<CourseInput>, JsonRejection>) -> Result<CourseInput, ApiError> {
    body.map(|Json(input)| input).map_err(|e| {
        tracing::debug!(error = %e, "malformed course body");
        ApiError::BadRequest(INVALID_COURSE.to_owned())
    })
}

fn message(text: &str) -> Json<MessageBody> {
    Json(MessageBody {
        message: text.to_owned(),
    })
}

pub(crate) async fn list_courses(
    State(state): State<ApiState>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = state.services.catalog().list_courses(&filter).await?;
    Ok(Json(courses))
}

pub(crate) async fn dashboard(
    State(state): State<ApiState>,
    user: AuthUser,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = state.services.dashboard().dashboard(user.user_id).await?;
    Ok(Json(summary))
}

pub(crate) async fn course_details(
    State(state): State<ApiState>,
    user: AuthUser,
    path: Result<Path<CourseId>, PathRejection>,
) -> Result<Json<CourseDetails>, ApiError> {
    let course_id = course_id(path)?;
    let details = state
        .services
        .progress()
        .course_details(user.user_id, course_id)
        .await?;
    Ok(Json(details))
}

pub(crate) async fn update_progress(
    State(state): State<ApiState>,
    user: AuthUser,
    path: Result<Path<CourseId>, PathRejection>,
    body: Result<Json<ProgressUpdate>, JsonRejection>,
) -> Result<Json<ProgressUpdated>, ApiError> {
    let course_id = course_id(path)?;
    let Json(update) = body.map_err(|e| {
        tracing::debug!(error = %e, "malformed progress body");
        ApiError::from(ProgressServiceError::InvalidInput(ProgressError::Missing))
    })?;

    let enrollment = state
        .services
        .progress()
        .set_progress(user.user_id, course_id, update.progress)
        .await?;
    Ok(Json(ProgressUpdated {
        message: PROGRESS_UPDATED.to_owned(),
        progress: enrollment.progress(),
        status: enrollment.status(),
    }))
}

pub(crate) async fn enroll(
    State(state): State<ApiState>,
    user: AuthUser,
    path: Result<Path<CourseId>, PathRejection>,
) -> Result<(StatusCode, Json<EnrollmentCreated>), ApiError> {
    let course_id = course_id(path)?;
    let enrollment = state
        .services
        .progress()
        .enroll(user.user_id, course_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(EnrollmentCreated {
            message: ENROLLED.to_owned(),
            enrollment,
        }),
    ))
}

pub(crate) async fn create_course(
    State(state): State<ApiState>,
    AdminUser(admin): AdminUser,
    body: Result<Json<CourseInput>, JsonRejection>,
) -> Result<(StatusCode, Json<CourseCreated>), ApiError> {
    let input = course_input(body)?;
    let course = state.services.catalog().create_course(input.into()).await?;
    tracing::debug!(admin = %admin.user_id, course_id = %course.id(), "admin created course");
    Ok((
        StatusCode::CREATED,
        Json(CourseCreated {
            id: course.id(),
            message: COURSE_CREATED.to_owned(),
        }),
    ))
}

pub(crate) async fn update_course(
    State(state): State<ApiState>,
    _admin: AdminUser,
    path: Result<Path<CourseId>, PathRejection>,
    body: Result<Json<CourseInput>, JsonRejection>,
) -> Result<Json<MessageBody>, ApiError> {
    let course_id = course_id(path)?;
    let input = course_input(body)?;
    state
        .services
        .catalog()
        .update_course(course_id, input.into())
        .await?;
    Ok(message(COURSE_UPDATED))
}

pub(crate) async fn delete_course(
    State(state): State<ApiState>,
    _admin: AdminUser,
    path: Result<Path<CourseId>, PathRejection>,
) -> Result<Json<MessageBody>, ApiError> {
    let course_id = course_id(path)?;
    state.services.catalog().delete_course(course_id).await?;
    Ok(message(COURSE_DELETED))
}
