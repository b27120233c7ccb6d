use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use course_core::model::{CourseId, EnrollmentStatus, Progress, UserId};

use crate::error::SyncError;
use crate::progress_service::ProgressService;
use crate::wire::{CourseDetails, MessageBody, ProgressUpdate, ProgressUpdated};

/// What the store reports back after a progress write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressAck {
    pub progress: Progress,
    pub status: EnrollmentStatus,
}

/// Channel between a step controller and the progress store.
#[async_trait]
pub trait ProgressSync: Send + Sync {
    /// Load the course page payload for the session's user.
    async fn fetch_details(&self, course_id: CourseId) -> Result<CourseDetails, SyncError>;

    /// Persist a new percentage. Safe to resend: the store write is idempotent.
    async fn push_progress(
        &self,
        course_id: CourseId,
        progress: Progress,
    ) -> Result<ProgressAck, SyncError>;
}

/// In-process sync for one user, straight over the progress service.
#[derive(Clone)]
pub struct LocalProgressSync {
    service: Arc<ProgressService>,
    user_id: UserId,
}

impl LocalProgressSync {
    #[must_use]
    pub fn new(service: Arc<ProgressService>, user_id: UserId) -> Self {
        Self { service, user_id }
    }
}

#[async_trait]
impl ProgressSync for LocalProgressSync {
    async fn fetch_details(&self, course_id: CourseId) -> Result<CourseDetails, SyncError> {
        Ok(self.service.course_details(self.user_id, course_id).await?)
    }

    async fn push_progress(
        &self,
        course_id: CourseId,
        progress: Progress,
    ) -> Result<ProgressAck, SyncError> {
        let enrollment = self
            .service
            .set_progress(self.user_id, course_id, Some(i64::from(progress)))
            .await?;
        Ok(ProgressAck {
            progress: enrollment.progress(),
            status: enrollment.status(),
        })
    }
}

/// Sync against the HTTP API with a bearer token.
#[derive(Clone)]
pub struct HttpProgressSync {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpProgressSync {
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Turn a non-success response into `SyncError::Rejected`, keeping the server message.
async fn reject_unless_success(response: Response) -> Result<Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<MessageBody>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_owned());
    Err(SyncError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ProgressSync for HttpProgressSync {
    async fn fetch_details(&self, course_id: CourseId) -> Result<CourseDetails, SyncError> {
        let response = self
            .client
            .get(self.url(&format!("/api/course/{course_id}/details")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let details: CourseDetails = reject_unless_success(response).await?.json().await?;
        Ok(details)
    }

    async fn push_progress(
        &self,
        course_id: CourseId,
        progress: Progress,
    ) -> Result<ProgressAck, SyncError> {
        let payload = ProgressUpdate {
            progress: Some(i64::from(progress)),
        };
        let response = self
            .client
            .post(self.url(&format!("/api/course/{course_id}/progress")))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;
        let body: ProgressUpdated = reject_unless_success(response).await?.json().await?;
        Ok(ProgressAck {
            progress: body.progress,
            status: body.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_url_without_double_slash() {
        let sync = HttpProgressSync::new("http://127.0.0.1:3002/", "t");
        assert_eq!(
            sync.url("/api/course/1/details"),
            "http://127.0.0.1:3002/api/course/1/details"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let sync = HttpProgressSync::new("http://127.0.0.1:1", "t");
        let err = sync
            .push_progress(CourseId::new(1), Progress::new(20).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Network(_)));
    }
}
