use std::sync::Arc;

use api::{ApiState, JwtVerifier, Role, router};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::Duration;
use course_core::model::{CourseId, EnrollmentStatus, Progress, StepId, UserId};
use course_core::time::fixed_now;
use services::controller::{HostedPlayerState, MediaElementEvent, PlaybackPlan, StepState};
use services::{
    AppServices, Clock, ControllerError, HttpProgressSync, ProgressSync, StepProgressController,
    SyncError,
};
use tower::ServiceExt;

const SECRET: &[u8] = b"sync-secret";
const GRAPHIC_DESIGN: CourseId = CourseId::new(1);

async fn serve(services: AppServices) -> String {
    let app = router(ApiState::new(services, Arc::new(JwtVerifier::new(SECRET))));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn token(user: UserId) -> String {
    JwtVerifier::new(SECRET)
        .issue(user, None, Role::Student, Duration::hours(1))
        .unwrap()
}

fn admin_token() -> String {
    JwtVerifier::new(SECRET)
        .issue(UserId::new(1), None, Role::Admin, Duration::hours(1))
        .unwrap()
}

#[tokio::test]
async fn controller_completes_steps_over_http() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()))
        .await
        .unwrap();
    let user = UserId::new(21);
    services.progress().enroll(user, GRAPHIC_DESIGN).await.unwrap();
    let base = serve(services.clone()).await;

    let sync: Arc<dyn ProgressSync> = Arc::new(HttpProgressSync::new(base, token(user)));
    let mut ctl = StepProgressController::load(sync, GRAPHIC_DESIGN, Clock::fixed(fixed_now()))
        .await
        .unwrap();
    assert_eq!(ctl.session().total_steps(), 5);

    let first = StepId::new(1);
    assert_eq!(ctl.state_of(first), Some(StepState::WatchRequired));
    ctl.on_playback(first, HostedPlayerState::Ended);
    let ack = ctl.mark_complete(first).await.unwrap();
    assert_eq!(ack.progress, Progress::new(20).unwrap());
    assert_eq!(ack.status, EnrollmentStatus::InProgress);

    let stored = services
        .progress()
        .get_enrollment(user, GRAPHIC_DESIGN)
        .await
        .unwrap();
    assert_eq!(stored.progress(), Progress::new(20).unwrap());
}

#[tokio::test]
async fn loading_without_enrollment_is_rejected() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()))
        .await
        .unwrap();
    let base = serve(services).await;

    let sync: Arc<dyn ProgressSync> =
        Arc::new(HttpProgressSync::new(base, token(UserId::new(22))));
    let err = StepProgressController::load(sync, GRAPHIC_DESIGN, Clock::fixed(fixed_now()))
        .await
        .err()
        .unwrap();
    match err {
        ControllerError::Sync(SyncError::Rejected { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "You are not enrolled in this course.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn course_video_set_by_admin_becomes_a_single_step() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()))
        .await
        .unwrap();
    let admin = router(ApiState::new(
        services.clone(),
        Arc::new(JwtVerifier::new(SECRET)),
    ));
    let body = serde_json::json!({
        "name": "Graphic Design Learning Path",
        "description": "One recorded session",
        "videoUrl": "/uploads/session.mp4",
    });
    let req = Request::builder()
        .method(Method::PUT)
        .uri(format!("/api/admin/courses/{GRAPHIC_DESIGN}"))
        .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = admin.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let user = UserId::new(23);
    services.progress().enroll(user, GRAPHIC_DESIGN).await.unwrap();
    let base = serve(services.clone()).await;

    let sync: Arc<dyn ProgressSync> = Arc::new(HttpProgressSync::new(base, token(user)));
    let mut ctl = StepProgressController::load(sync, GRAPHIC_DESIGN, Clock::fixed(fixed_now()))
        .await
        .unwrap();
    assert_eq!(ctl.session().total_steps(), 1);

    let only = StepId::new(1);
    assert_eq!(
        ctl.playback_plan(only),
        Some(PlaybackPlan::NativeMedia {
            url: "/uploads/session.mp4".into()
        })
    );
    ctl.on_playback(only, MediaElementEvent::Ended);
    let ack = ctl.mark_complete(only).await.unwrap();
    assert_eq!(ack.progress, Progress::new(100).unwrap());
    assert_eq!(ack.status, EnrollmentStatus::Completed);
    assert!(ctl.certificate_visible());
}
