//! Job repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use files_core::error::{AppError, ErrorKind};
use files_core::result::AppResult;
use files_core::traits::queue::JobState;
use files_core::types::JobId;
use files_entity::job::Job;

/// Repository for the `jobs` table backing the PostgreSQL queue.
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    /// Create a new job repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a pending job.
    pub async fn create(&self, queue: &str, payload: &serde_json::Value) -> AppResult<JobId> {
        sqlx::query_scalar::<_, JobId>(
            "INSERT INTO jobs (id, queue, payload) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(JobId::new())
        .bind(queue)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Queue, "Failed to enqueue job", e))
    }

    /// Claim the oldest pending job from a queue (SKIP LOCKED for concurrency).
    pub async fn dequeue(&self, queue: &str, worker_id: &str) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'running', started_at = NOW(), worker_id = $2, \
             attempts = attempts + 1 \
             WHERE id = ( \
                SELECT id FROM jobs \
                WHERE queue = $1 AND status = 'pending' \
                ORDER BY created_at ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT 1 \
             ) RETURNING *",
        )
        .bind(queue)
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to dequeue job", e))
    }

    /// Mark a job as completed.
    pub async fn complete(&self, id: JobId) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'completed', error_message = NULL, completed_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete job", e))?;
        Ok(())
    }

    /// Mark a job as failed for good.
    pub async fn fail(&self, id: JobId, error_message: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'failed', error_message = $2, completed_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark job as failed", e)
        })?;
        Ok(())
    }

    /// Return a claimed job to pending, keeping the failure reason.
    pub async fn release(&self, id: JobId, error_message: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'pending', error_message = $2, started_at = NULL, \
             worker_id = NULL WHERE id = $1",
        )
        .bind(id)
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to release job", e))?;
        Ok(())
    }

    /// Current state of a job.
    pub async fn state(&self, id: JobId) -> AppResult<Option<JobState>> {
        sqlx::query_scalar::<_, JobState>("SELECT status FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read job state", e))
    }

    /// Return running jobs claimed before `before` to pending.
    pub async fn requeue_stale(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE jobs SET status = 'pending', started_at = NULL, worker_id = NULL \
             WHERE status = 'running' AND started_at < $1",
        )
        .bind(before)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to requeue stale jobs", e))?;
        Ok(result.rows_affected())
    }

    /// Check that the jobs table is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        crate::connection::ping(&self.pool).await
    }
}
