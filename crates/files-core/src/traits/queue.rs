//! Job queue backend trait.
//!
//! Backends deliver JSON payloads at-least-once to one consumer attempt at
//! a time. Typed payloads and handlers live in the entity and worker crates;
//! this trait only moves opaque JSON between named queues.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::types::JobId;

/// Lifecycle of a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "job_status", rename_all = "lowercase")
)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Waiting to be claimed.
    Pending,
    /// Claimed by a worker.
    Running,
    /// Handler finished successfully.
    Completed,
    /// Handler failed and no attempts remain.
    Failed,
}

impl JobState {
    /// Database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown job state '{other}'")),
        }
    }
}

/// A job claimed from a queue by one consumer.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Job identifier, used to acknowledge the delivery.
    pub id: JobId,
    /// Queue the job was claimed from.
    pub queue: String,
    /// Producer payload.
    pub payload: serde_json::Value,
    /// Attempt number of this delivery, starting at 1.
    pub attempt: u32,
}

/// Storage and delivery of queued jobs.
#[async_trait]
pub trait QueueBackend: Send + Sync + fmt::Debug + 'static {
    /// Append a job to `queue`. Fails with `ErrorKind::Queue` when the
    /// broker cannot accept it.
    async fn push(&self, queue: &str, payload: serde_json::Value) -> AppResult<JobId>;

    /// Claim the oldest pending job of `queue`, if any. A claimed job is
    /// invisible to other consumers until it is completed or failed.
    async fn pop(&self, queue: &str, worker_id: &str) -> AppResult<Option<Delivery>>;

    /// Acknowledge a delivery as successful.
    async fn complete(&self, id: JobId) -> AppResult<()>;

    /// Record a failed delivery. With `retry` the job goes back to pending,
    /// otherwise it stays failed with `error` as its operator-visible reason.
    async fn fail(&self, id: JobId, error: &str, retry: bool) -> AppResult<()>;

    /// Current state of a job, or `None` if it is unknown here. Backends
    /// that forget completed jobs also return `None` for those.
    async fn state(&self, id: JobId) -> AppResult<Option<JobState>>;

    /// Return running jobs claimed longer ago than `older_than` to pending.
    async fn recover_stale(&self, older_than: Duration) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_state_parse() {
        for state in [
            JobState::Pending,
            JobState::Running,
            JobState::Completed,
            JobState::Failed,
        ] {
            assert_eq!(state.as_str().parse::<JobState>(), Ok(state));
        }
        assert!("queued".parse::<JobState>().is_err());
    }
}
