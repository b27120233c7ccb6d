#![forbid(unsafe_code)]

//! HTTP surface for course enrollment and progress.

pub mod auth;
pub mod error;
mod routes;
pub mod state;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

pub use auth::{AdminUser, AuthError, AuthUser, JwtVerifier, Role, TokenVerifier};
pub use error::ApiError;
pub use state::ApiState;

/// Build the `/api` router over `state`.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/courses", get(routes::list_courses))
        .route("/api/dashboard", get(routes::dashboard))
        .route("/api/course/{course_id}/details", get(routes::course_details))
        .route("/api/course/{course_id}/progress", post(routes::update_progress))
        .route("/api/enroll/{course_id}", post(routes::enroll))
        .route("/api/admin/courses", post(routes::create_course))
        .route(
            "/api/admin/courses/{course_id}",
            put(routes::update_course).delete(routes::delete_course),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
