//! Typed producers for the background queues.

use std::sync::Arc;

use serde::Serialize;

use files_core::error::{AppError, ErrorKind};
use files_core::result::AppResult;
use files_core::traits::queue::QueueBackend;
use files_core::types::{FileId, JobId, UserId};
use files_entity::job::{JobKind, ThumbnailPayload, WelcomePayload};

/// Enqueues jobs with their typed payloads.
///
/// Every call returns the broker's answer: a refused enqueue surfaces as
/// `ErrorKind::Queue` and it is up to the caller to ignore it or not.
#[derive(Debug, Clone)]
pub struct JobDispatcher {
    backend: Arc<dyn QueueBackend>,
}

impl JobDispatcher {
    /// Creates a dispatcher over a queue backend.
    pub fn new(backend: Arc<dyn QueueBackend>) -> Self {
        Self { backend }
    }

    /// Ask for the welcome notification of a new user.
    pub async fn enqueue_welcome(&self, user_id: UserId) -> AppResult<JobId> {
        self.enqueue(JobKind::WelcomeEmail, &WelcomePayload::new(user_id))
            .await
    }

    /// Ask for the thumbnails of an uploaded image.
    pub async fn enqueue_thumbnail(&self, file_id: FileId, user_id: UserId) -> AppResult<JobId> {
        self.enqueue(
            JobKind::FileThumbnail,
            &ThumbnailPayload::new(file_id, user_id),
        )
        .await
    }

    async fn enqueue<P: Serialize>(&self, kind: JobKind, payload: &P) -> AppResult<JobId> {
        let payload = serde_json::to_value(payload)?;
        let id = self
            .backend
            .push(kind.queue_name(), payload)
            .await
            .map_err(|e| {
                if e.is(ErrorKind::Queue) {
                    e
                } else {
                    AppError::with_source(ErrorKind::Queue, "Failed to enqueue job", e)
                }
            })?;
        tracing::debug!(job_id = %id, queue = kind.queue_name(), "Job enqueued");
        Ok(id)
    }
}
