//! Job executor: dispatches deliveries to the handler registered for their queue.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use files_core::error::AppError;
use files_core::result::AppResult;
use files_core::traits::queue::Delivery;
use files_entity::job::JobKind;

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// The job kind (and therefore queue) this handler consumes
    fn kind(&self) -> JobKind;

    /// Process one delivery, optionally returning a result summary
    async fn execute(&self, job: &Delivery) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// The job can never succeed (bad payload, missing record); never retried
    #[error("{0}")]
    Permanent(AppError),

    /// Transient failure, may be retried
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error from a collaborator
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl JobExecutionError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Permanent(_))
    }
}

/// Holds the single handler of each queue
#[derive(Debug, Default)]
pub struct JobExecutor {
    handlers: HashMap<&'static str, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create a new job executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the consumer of a queue. A queue has at most one consumer;
    /// registering a second one is a configuration error.
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) -> AppResult<()> {
        let queue = handler.kind().queue_name();
        if self.handlers.contains_key(queue) {
            return Err(AppError::configuration(format!(
                "A consumer is already registered for queue '{queue}'"
            )));
        }
        tracing::info!(queue, "Registered job handler");
        self.handlers.insert(queue, handler);
        Ok(())
    }

    /// Execute a delivery by dispatching to its queue's handler
    pub async fn execute(&self, job: &Delivery) -> Result<Option<Value>, JobExecutionError> {
        let handler = self.handlers.get(job.queue.as_str()).ok_or_else(|| {
            JobExecutionError::Permanent(AppError::configuration(format!(
                "No handler registered for queue '{}'",
                job.queue
            )))
        })?;

        tracing::debug!(job_id = %job.id, queue = %job.queue, attempt = job.attempt, "Executing job");

        handler.execute(job).await
    }

    /// Check if a handler is registered for a queue
    pub fn has_handler(&self, queue: &str) -> bool {
        self.handlers.contains_key(queue)
    }

    /// Queues with a registered handler, in stable order
    pub fn queues(&self) -> Vec<&'static str> {
        let mut queues: Vec<_> = self.handlers.keys().copied().collect();
        queues.sort_unstable();
        queues
    }
}
