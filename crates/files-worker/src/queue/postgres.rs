//! PostgreSQL-backed queue over the `jobs` table.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use files_core::error::AppError;
use files_core::result::AppResult;
use files_core::traits::queue::{Delivery, JobState, QueueBackend};
use files_core::types::JobId;
use files_database::{DatabasePool, JobRepository};

/// Durable queue. Jobs survive restarts; claims use `FOR UPDATE SKIP LOCKED`
/// so concurrent workers never receive the same pending job.
#[derive(Debug, Clone)]
pub struct PgQueueBackend {
    jobs: JobRepository,
}

impl PgQueueBackend {
    /// Create a backend over the given pool.
    pub fn new(pool: &DatabasePool) -> Self {
        Self {
            jobs: JobRepository::new(pool.pool().clone()),
        }
    }
}

#[async_trait]
impl QueueBackend for PgQueueBackend {
    async fn push(&self, queue: &str, payload: serde_json::Value) -> AppResult<JobId> {
        let id = self.jobs.create(queue, &payload).await?;
        tracing::debug!(job_id = %id, queue, "Enqueued job");
        Ok(id)
    }

    async fn pop(&self, queue: &str, worker_id: &str) -> AppResult<Option<Delivery>> {
        Ok(self
            .jobs
            .dequeue(queue, worker_id)
            .await?
            .map(|job| job.into_delivery()))
    }

    async fn complete(&self, id: JobId) -> AppResult<()> {
        self.jobs.complete(id).await
    }

    async fn fail(&self, id: JobId, error: &str, retry: bool) -> AppResult<()> {
        if retry {
            self.jobs.release(id, error).await
        } else {
            self.jobs.fail(id, error).await
        }
    }

    async fn state(&self, id: JobId) -> AppResult<Option<JobState>> {
        self.jobs.state(id).await
    }

    async fn recover_stale(&self, older_than: Duration) -> AppResult<u64> {
        let older_than = chrono::Duration::from_std(older_than)
            .map_err(|e| AppError::configuration(format!("Invalid stale threshold: {e}")))?;
        self.jobs.requeue_stale(Utc::now() - older_than).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.jobs.health_check().await
    }
}
