//! In-process queue backend.
//!
//! Jobs live only as long as the process. Suitable for tests and for
//! running the embedded worker next to the API server. Completed jobs are
//! dropped on acknowledgement; failed ones are kept with their reason.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use files_core::error::AppError;
use files_core::result::AppResult;
use files_core::traits::queue::{Delivery, JobState, QueueBackend};
use files_core::types::JobId;

#[derive(Debug)]
struct Record {
    queue: String,
    payload: serde_json::Value,
    state: JobState,
    attempts: u32,
    error: Option<String>,
    claimed_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct Inner {
    pending: HashMap<String, VecDeque<JobId>>,
    records: HashMap<JobId, Record>,
}

/// Queue backend held in process memory.
#[derive(Debug, Default)]
pub struct MemoryQueueBackend {
    inner: Mutex<Inner>,
}

impl MemoryQueueBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of jobs waiting in `queue`.
    pub fn pending(&self, queue: &str) -> usize {
        self.lock().pending.get(queue).map_or(0, VecDeque::len)
    }

    /// Failure reason recorded for a job.
    pub fn error(&self, id: JobId) -> Option<String> {
        self.lock().records.get(&id).and_then(|r| r.error.clone())
    }

    /// Payload of a job.
    pub fn payload(&self, id: JobId) -> Option<serde_json::Value> {
        self.lock().records.get(&id).map(|r| r.payload.clone())
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.lock().records.len()
    }
}

#[async_trait]
impl QueueBackend for MemoryQueueBackend {
    async fn push(&self, queue: &str, payload: serde_json::Value) -> AppResult<JobId> {
        let id = JobId::new();
        let mut inner = self.lock();
        inner.records.insert(
            id,
            Record {
                queue: queue.to_string(),
                payload,
                state: JobState::Pending,
                attempts: 0,
                error: None,
                claimed_at: None,
            },
        );
        inner
            .pending
            .entry(queue.to_string())
            .or_default()
            .push_back(id);
        tracing::debug!(job_id = %id, queue, "Enqueued job");
        Ok(id)
    }

    async fn pop(&self, queue: &str, worker_id: &str) -> AppResult<Option<Delivery>> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let Some(id) = inner.pending.get_mut(queue).and_then(VecDeque::pop_front) else {
            return Ok(None);
        };
        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| AppError::queue(format!("Job {id} is queued but has no record")))?;
        record.state = JobState::Running;
        record.attempts += 1;
        record.claimed_at = Some(Instant::now());
        tracing::trace!(job_id = %id, queue, worker_id, "Claimed job");
        Ok(Some(Delivery {
            id,
            queue: record.queue.clone(),
            payload: record.payload.clone(),
            attempt: record.attempts,
        }))
    }

    async fn complete(&self, id: JobId) -> AppResult<()> {
        self.lock()
            .records
            .remove(&id)
            .ok_or_else(|| AppError::queue(format!("Unknown job {id}")))?;
        tracing::trace!(job_id = %id, "Completed job");
        Ok(())
    }

    async fn fail(&self, id: JobId, error: &str, retry: bool) -> AppResult<()> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| AppError::queue(format!("Unknown job {id}")))?;
        record.error = Some(error.to_string());
        record.claimed_at = None;
        if retry {
            record.state = JobState::Pending;
            inner
                .pending
                .entry(record.queue.clone())
                .or_default()
                .push_back(id);
        } else {
            record.state = JobState::Failed;
        }
        Ok(())
    }

    async fn state(&self, id: JobId) -> AppResult<Option<JobState>> {
        Ok(self.lock().records.get(&id).map(|r| r.state))
    }

    async fn recover_stale(&self, older_than: Duration) -> AppResult<u64> {
        let now = Instant::now();
        let mut guard = self.lock();
        let inner = &mut *guard;
        let mut recovered = 0;
        for (id, record) in inner.records.iter_mut() {
            let stale = record.state == JobState::Running
                && record
                    .claimed_at
                    .is_some_and(|at| now.duration_since(at) > older_than);
            if stale {
                record.state = JobState::Pending;
                record.claimed_at = None;
                inner
                    .pending
                    .entry(record.queue.clone())
                    .or_default()
                    .push_back(*id);
                recovered += 1;
            }
        }
        Ok(recovered)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
