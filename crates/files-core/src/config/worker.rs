//! Job queue and background worker configuration.

use serde::{Deserialize, Serialize};

/// Where jobs wait for a worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueProvider {
    /// In-process only; only the embedded worker can consume it.
    #[default]
    Memory,
    /// The `jobs` table, shared by every process on the database.
    Postgres,
}

/// The `[queue]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Backend producers push to and workers claim from.
    #[serde(default)]
    pub provider: QueueProvider,
}

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the server process also runs an embedded worker.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent job processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in milliseconds between polls of an empty queue.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Attempts per job before it is marked failed. `1` disables retry.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Running jobs older than this are re-queued when a worker starts.
    #[serde(default = "default_stale_after")]
    pub stale_after_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            concurrency: default_concurrency(),
            poll_interval_ms: default_poll_interval(),
            max_attempts: default_max_attempts(),
            stale_after_seconds: default_stale_after(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    500
}

fn default_max_attempts() -> u32 {
    1
}

fn default_stale_after() -> u64 {
    600
}
