//! Background job processing for Files Manager.
//!
//! This crate provides:
//! - Queue backends (in-memory and PostgreSQL) behind
//!   [`QueueBackend`](files_core::traits::QueueBackend)
//! - A job executor holding exactly one handler per queue
//! - A worker runner that polls the registered queues and acknowledges jobs
//! - The thumbnail and welcome job handlers

pub mod executor;
pub mod jobs;
pub mod notifier;
pub mod queue;
pub mod runner;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use notifier::{LogNotifier, WelcomeNotifier};
pub use queue::{MemoryQueueBackend, PgQueueBackend};
pub use runner::{JobOutcome, WorkerRunner};
