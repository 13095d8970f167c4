//! Worker runner: the loop that polls queues and executes jobs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::time;

use files_core::config::worker::WorkerConfig;
use files_core::result::AppResult;
use files_core::traits::queue::{Delivery, JobState, QueueBackend};
use files_core::types::JobId;

use crate::executor::{JobExecutionError, JobExecutor};

/// How long shutdown waits for in-flight jobs.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Final disposition of one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    /// The job.
    pub id: JobId,
    /// Queue it came from.
    pub queue: String,
    /// State after acknowledgement: completed, failed, or pending on retry.
    pub state: JobState,
    /// Failure reason, if the handler failed.
    pub error: Option<String>,
}

/// Main worker runner that polls queues and executes jobs
#[derive(Debug)]
pub struct WorkerRunner {
    backend: Arc<dyn QueueBackend>,
    executor: Arc<JobExecutor>,
    config: WorkerConfig,
    worker_id: String,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(
        backend: Arc<dyn QueueBackend>,
        executor: Arc<JobExecutor>,
        config: WorkerConfig,
        worker_id: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            executor,
            config,
            worker_id: worker_id.into(),
        }
    }

    /// Start the worker runner. Runs until the cancel signal is received
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let queues = self.executor.queues();
        tracing::info!(
            worker_id = %self.worker_id,
            concurrency = self.config.concurrency,
            poll_interval_ms = self.config.poll_interval_ms,
            ?queues,
            "Worker started"
        );

        let stale_after = Duration::from_secs(self.config.stale_after_seconds);
        match self.backend.recover_stale(stale_after).await {
            Ok(0) => {}
            Ok(n) => tracing::warn!(recovered = n, "Re-queued stale running jobs"),
            Err(e) => tracing::error!(error = %e, "Failed to recover stale jobs"),
        }

        let concurrency = self.config.concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            if *cancel.borrow() {
                break;
            }

            let claimed = self.poll_and_spawn(&queues, &semaphore, &mut cancel).await;
            if claimed {
                continue;
            }

            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                _ = time::sleep(poll_interval) => {}
            }
        }

        tracing::info!(worker_id = %self.worker_id, "Waiting for in-flight jobs to complete");

        let permits = u32::try_from(concurrency).unwrap_or(u32::MAX);
        if time::timeout(SHUTDOWN_GRACE, semaphore.acquire_many(permits))
            .await
            .is_err()
        {
            tracing::warn!(worker_id = %self.worker_id, "In-flight jobs still running at shutdown");
        }

        tracing::info!(worker_id = %self.worker_id, "Worker shut down");
    }

    /// Claim at most one job per queue while slots are free. Returns whether
    /// anything was claimed. Nothing is claimed once `cancel` is set.
    async fn poll_and_spawn(
        &self,
        queues: &[&'static str],
        semaphore: &Arc<Semaphore>,
        cancel: &mut watch::Receiver<bool>,
    ) -> bool {
        let mut claimed = false;

        for queue in queues {
            let permit = tokio::select! {
                permit = Arc::clone(semaphore).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => return claimed,
                },
                _ = cancel.wait_for(|stop| *stop) => return claimed,
            };

            if *cancel.borrow() {
                return claimed;
            }

            match self.backend.pop(queue, &self.worker_id).await {
                Ok(Some(delivery)) => {
                    claimed = true;
                    let backend = Arc::clone(&self.backend);
                    let executor = Arc::clone(&self.executor);
                    let max_attempts = self.config.max_attempts;
                    tokio::spawn(async move {
                        let _permit = permit;
                        process(backend.as_ref(), &executor, max_attempts, delivery).await;
                    });
                }
                Ok(None) => {
                    tracing::trace!(queue, "Queue empty");
                }
                Err(e) => {
                    tracing::error!(queue, error = %e, "Failed to claim job");
                }
            }
        }

        claimed
    }

    /// Claim and run the next job of `queue` on the current task.
    pub async fn process_next(&self, queue: &str) -> AppResult<Option<JobOutcome>> {
        let Some(delivery) = self.backend.pop(queue, &self.worker_id).await? else {
            return Ok(None);
        };
        Ok(Some(
            process(
                self.backend.as_ref(),
                &self.executor,
                self.config.max_attempts,
                delivery,
            )
            .await,
        ))
    }

    /// Run jobs from every registered queue until all are empty.
    pub async fn drain(&self) -> AppResult<Vec<JobOutcome>> {
        let mut outcomes = Vec::new();
        loop {
            let mut progressed = false;
            for queue in self.executor.queues() {
                if let Some(outcome) = self.process_next(queue).await? {
                    outcomes.push(outcome);
                    progressed = true;
                }
            }
            if !progressed {
                return Ok(outcomes);
            }
        }
    }
}

/// Execute one delivery and acknowledge it.
async fn process(
    backend: &dyn QueueBackend,
    executor: &JobExecutor,
    max_attempts: u32,
    delivery: Delivery,
) -> JobOutcome {
    let id = delivery.id;
    let attempt = delivery.attempt;
    let queue = delivery.queue.clone();

    tracing::info!(job_id = %id, %queue, attempt, max_attempts, "Processing job");

    let (state, error) = match executor.execute(&delivery).await {
        Ok(_) => {
            if let Err(e) = backend.complete(id).await {
                tracing::error!(job_id = %id, error = %e, "Failed to mark job as completed");
            }
            tracing::info!(job_id = %id, %queue, "Job completed");
            (JobState::Completed, None)
        }
        Err(err) => {
            let message = match &err {
                JobExecutionError::Permanent(e) | JobExecutionError::Internal(e) => {
                    e.message.clone()
                }
                JobExecutionError::Transient(msg) => msg.clone(),
            };
            let retry = err.is_retryable() && attempt < max_attempts;
            if retry {
                tracing::warn!(job_id = %id, %queue, attempt, error = %err, "Job failed, will retry");
            } else {
                tracing::error!(job_id = %id, %queue, attempt, error = %err, "Job failed");
            }
            if let Err(e) = backend.fail(id, &message, retry).await {
                tracing::error!(job_id = %id, error = %e, "Failed to record job failure");
            }
            let state = if retry {
                JobState::Pending
            } else {
                JobState::Failed
            };
            (state, Some(message))
        }
    };

    JobOutcome {
        id,
        queue,
        state,
        error,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use files_core::error::AppError;
    use files_entity::job::JobKind;

    use super::*;
    use crate::executor::JobHandler;
    use crate::queue::MemoryQueueBackend;

    #[derive(Debug, Default)]
    struct Flaky {
        calls: AtomicU32,
        fail_first: u32,
    }

    #[async_trait]
    impl JobHandler for Flaky {
        fn kind(&self) -> JobKind {
            JobKind::WelcomeEmail
        }

        async fn execute(&self, _job: &Delivery) -> Result<Option<Value>, JobExecutionError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                Err(JobExecutionError::Transient("mail relay busy".into()))
            } else {
                Ok(None)
            }
        }
    }

    #[derive(Debug)]
    struct Rejects;

    #[async_trait]
    impl JobHandler for Rejects {
        fn kind(&self) -> JobKind {
            JobKind::FileThumbnail
        }

        async fn execute(&self, _job: &Delivery) -> Result<Option<Value>, JobExecutionError> {
            Err(JobExecutionError::Permanent(AppError::not_found("File not found")))
        }
    }

    #[derive(Debug, Default)]
    struct Slow {
        started: AtomicU32,
    }

    #[async_trait]
    impl JobHandler for Slow {
        fn kind(&self) -> JobKind {
            JobKind::WelcomeEmail
        }

        async fn execute(&self, _job: &Delivery) -> Result<Option<Value>, JobExecutionError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            time::sleep(Duration::from_millis(300)).await;
            Ok(None)
        }
    }

    fn runner(
        backend: Arc<MemoryQueueBackend>,
        handler: Arc<dyn JobHandler>,
        max_attempts: u32,
    ) -> WorkerRunner {
        let mut executor = JobExecutor::new();
        executor.register(handler).unwrap();
        let config = WorkerConfig {
            max_attempts,
            poll_interval_ms: 10,
            ..WorkerConfig::default()
        };
        WorkerRunner::new(backend, Arc::new(executor), config, "test-worker")
    }

    #[tokio::test]
    async fn test_completed_job() {
        let backend = Arc::new(MemoryQueueBackend::new());
        let id = backend.push("welcome_email", json!({})).await.unwrap();
        let runner = runner(Arc::clone(&backend), Arc::new(Flaky::default()), 1);

        let outcome = runner.process_next("welcome_email").await.unwrap().unwrap();
        assert_eq!(outcome.state, JobState::Completed);
        assert!(backend.state(id).await.unwrap().is_none());
        assert!(runner.process_next("welcome_email").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let backend = Arc::new(MemoryQueueBackend::new());
        let id = backend.push("welcome_email", json!({})).await.unwrap();
        let handler = Arc::new(Flaky {
            fail_first: 1,
            ..Flaky::default()
        });
        let runner = runner(Arc::clone(&backend), handler, 1);

        let outcomes = runner.drain().await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(backend.state(id).await.unwrap(), Some(JobState::Failed));
        assert_eq!(backend.error(id).as_deref(), Some("mail relay busy"));
    }

    #[tokio::test]
    async fn test_transient_failure_retries_up_to_max() {
        let backend = Arc::new(MemoryQueueBackend::new());
        let id = backend.push("welcome_email", json!({})).await.unwrap();
        let handler = Arc::new(Flaky {
            fail_first: 2,
            ..Flaky::default()
        });
        let runner = runner(Arc::clone(&backend), handler.clone(), 3);

        let outcomes = runner.drain().await.unwrap();
        let states: Vec<_> = outcomes.iter().map(|o| o.state).collect();
        assert_eq!(
            states,
            vec![JobState::Pending, JobState::Pending, JobState::Completed]
        );
        assert!(outcomes.iter().all(|o| o.id == id));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 3);
        assert!(backend.state(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_permanent_failure_never_retries() {
        let backend = Arc::new(MemoryQueueBackend::new());
        let id = backend.push("file_thumbnail", json!({})).await.unwrap();
        let runner = runner(Arc::clone(&backend), Arc::new(Rejects), 5);

        let outcomes = runner.drain().await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].error.as_deref(), Some("File not found"));
        assert_eq!(backend.state(id).await.unwrap(), Some(JobState::Failed));
    }

    #[tokio::test]
    async fn test_run_until_cancelled() {
        let backend = Arc::new(MemoryQueueBackend::new());
        let id = backend.push("welcome_email", json!({})).await.unwrap();
        let runner = Arc::new(runner(Arc::clone(&backend), Arc::new(Flaky::default()), 1));

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn({
            let runner = Arc::clone(&runner);
            async move { runner.run(rx).await }
        });

        for _ in 0..100 {
            if backend.state(id).await.unwrap().is_none() {
                break;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        assert!(backend.state(id).await.unwrap().is_none());

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_claiming() {
        let backend = Arc::new(MemoryQueueBackend::new());
        for _ in 0..3 {
            backend.push("welcome_email", json!({})).await.unwrap();
        }
        let handler = Arc::new(Slow::default());
        let mut executor = JobExecutor::new();
        executor.register(Arc::clone(&handler) as Arc<dyn JobHandler>).unwrap();
        let config = WorkerConfig {
            concurrency: 1,
            poll_interval_ms: 10,
            ..WorkerConfig::default()
        };
        let runner = WorkerRunner::new(
            Arc::clone(&backend) as Arc<dyn QueueBackend>,
            Arc::new(executor),
            config,
            "test-worker",
        );

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(async move { runner.run(rx).await });

        time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();
        task.await.unwrap();

        assert_eq!(handler.started.load(Ordering::SeqCst), 1);
        assert_eq!(backend.pending("welcome_email"), 2);
    }
}
