//! Persisted job row.

use chrono::{DateTime, Utc};
use files_core::traits::queue::{Delivery, JobState};
use files_core::types::JobId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A background job as stored in the `jobs` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,
    /// Queue name, see [`JobKind::queue_name`](super::JobKind::queue_name).
    pub queue: String,
    /// Producer payload.
    pub payload: serde_json::Value,
    /// Lifecycle state.
    pub status: JobState,
    /// Number of deliveries so far.
    pub attempts: i32,
    /// Failure reason of the last attempt.
    pub error_message: Option<String>,
    /// Worker holding the claim.
    pub worker_id: Option<String>,
    /// When the job was enqueued.
    pub created_at: DateTime<Utc>,
    /// When the current claim was taken.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// The consumer view of a claimed job.
    pub fn into_delivery(self) -> Delivery {
        Delivery {
            id: self.id,
            queue: self.queue,
            payload: self.payload,
            attempt: u32::try_from(self.attempts).unwrap_or(1),
        }
    }
}
