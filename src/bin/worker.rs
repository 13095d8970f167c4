//! Standalone Files Manager worker: consumes the shared job queues.

use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;

use files_api::{Backends, build_executor};
use files_core::config::AppConfig;
use files_core::config::database::StoreProvider;
use files_core::config::worker::QueueProvider;
use files_core::error::AppError;
use files_core::traits::QueueBackend;
use files_manager::cli::Args;
use files_manager::shutdown::notify_on_signal;
use files_manager::telemetry::init_logging;
use files_worker::WorkerRunner;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = match args.load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Worker error");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    if config.queue.provider == QueueProvider::Memory {
        return Err(AppError::configuration(
            "A standalone worker needs a shared queue; set queue.provider = \"postgres\"",
        ));
    }

    if config.database.provider == StoreProvider::Memory {
        tracing::warn!("Standalone worker with an in-memory store cannot see the server's records");
    }

    let backends = Backends::connect(&config).await?;
    if !backends.queue.health_check().await? {
        return Err(AppError::queue("Job queue is not reachable"));
    }
    let executor = Arc::new(build_executor(&config, &backends)?);
    let runner = WorkerRunner::new(
        Arc::clone(&backends.queue),
        executor,
        config.worker.clone(),
        files_api::app::worker_id(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(notify_on_signal(shutdown_tx));

    runner.run(shutdown_rx).await;

    backends.close().await;
    Ok(())
}
