//! Files Manager server: HTTP API plus, when enabled, an embedded worker.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;

use files_api::{Backends, build_app, build_executor, build_state};
use files_core::config::AppConfig;
use files_core::config::worker::QueueProvider;
use files_core::error::AppError;
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
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Files Manager");

    let backends = Backends::connect(&config).await?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_handle = if config.worker.enabled {
        let executor = Arc::new(build_executor(&config, &backends)?);
        let runner = WorkerRunner::new(
            Arc::clone(&backends.queue),
            executor,
            config.worker.clone(),
            files_api::app::worker_id(),
        );
        let cancel = shutdown_rx.clone();
        Some(tokio::spawn(async move { runner.run(cancel).await }))
    } else {
        if config.queue.provider == QueueProvider::Memory {
            tracing::warn!(
                "Embedded worker disabled with an in-memory queue: jobs will never be processed"
            );
        }
        None
    };

    let addr = config.server.bind_addr();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = build_app(build_state(config, &backends)?);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(%addr, "Listening");

    let mut server_shutdown = shutdown_rx.clone();
    tokio::spawn(notify_on_signal(shutdown_tx));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.wait_for(|stop| *stop).await;
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = worker_handle {
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Worker did not stop within the grace period");
        }
    }

    backends.close().await;
    tracing::info!("Files Manager stopped");
    Ok(())
}
