//! Application builder: connects the backends selected by configuration
//! and wires services, state, and the job executor on top of them.

use std::sync::Arc;

use axum::Router;

use files_auth::{PasswordHasher, SessionManager};
use files_cache::CacheManager;
use files_core::config::AppConfig;
use files_core::config::database::StoreProvider;
use files_core::config::worker::QueueProvider;
use files_core::error::AppError;
use files_core::result::AppResult;
use files_core::traits::cache::CacheProvider;
use files_core::traits::queue::QueueBackend;
use files_database::{
    DatabasePool, FileRepository, FileStore, MemoryFileStore, MemoryUserStore, UserRepository,
    UserStore,
};
use files_service::{AppService, FileService, JobDispatcher, UserService};
use files_storage::{LocalStorageProvider, ThumbnailGenerator};
use files_worker::jobs::{FileThumbnailJob, WelcomeEmailJob};
use files_worker::{JobExecutor, LogNotifier, MemoryQueueBackend, PgQueueBackend};

use crate::router::build_router;
use crate::state::AppState;

/// Connected collaborators, constructed once per process and shared by
/// the HTTP layer and the worker.
#[derive(Debug, Clone)]
pub struct Backends {
    /// The PostgreSQL pool, when any backend uses it.
    pub pool: Option<DatabasePool>,
    /// Durable user records.
    pub users: Arc<dyn UserStore>,
    /// Durable file records.
    pub files: Arc<dyn FileStore>,
    /// Session cache.
    pub cache: Arc<dyn CacheProvider>,
    /// Job queue.
    pub queue: Arc<dyn QueueBackend>,
    /// Content storage.
    pub storage: LocalStorageProvider,
}

impl Backends {
    /// Connect every backend named in the configuration.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        let needs_pool = config.database.provider == StoreProvider::Postgres
            || config.queue.provider == QueueProvider::Postgres;
        let pool = if needs_pool {
            Some(DatabasePool::connect(&config.database).await?)
        } else {
            None
        };
        let pg = |what: &str| {
            pool.clone().ok_or_else(|| {
                AppError::configuration(format!("{what} requires a PostgreSQL pool"))
            })
        };

        let (users, files): (Arc<dyn UserStore>, Arc<dyn FileStore>) =
            match config.database.provider {
                StoreProvider::Postgres => {
                    let pool = pg("database.provider")?;
                    tracing::info!("Using PostgreSQL document store");
                    (
                        Arc::new(UserRepository::new(pool.pool().clone())),
                        Arc::new(FileRepository::new(pool.pool().clone())),
                    )
                }
                StoreProvider::Memory => {
                    tracing::info!("Using in-memory document store");
                    (
                        Arc::new(MemoryUserStore::new()),
                        Arc::new(MemoryFileStore::new()),
                    )
                }
            };

        let queue: Arc<dyn QueueBackend> = match config.queue.provider {
            QueueProvider::Postgres => {
                tracing::info!("Using PostgreSQL job queue");
                Arc::new(PgQueueBackend::new(&pg("queue.provider")?))
            }
            QueueProvider::Memory => {
                tracing::info!("Using in-memory job queue");
                Arc::new(MemoryQueueBackend::new())
            }
        };

        let cache: Arc<dyn CacheProvider> = Arc::new(CacheManager::new(&config.cache).await?);
        let storage = LocalStorageProvider::new(&config.storage.folder_path).await?;
        tracing::info!(root = %storage.root().display(), "Storage ready");

        Ok(Self {
            pool,
            users,
            files,
            cache,
            queue,
            storage,
        })
    }

    /// Release pooled connections.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

/// Build the shared handler state.
pub fn build_state(config: AppConfig, backends: &Backends) -> AppResult<AppState> {
    let hasher = PasswordHasher::new(&config.auth)?;
    let jobs = JobDispatcher::new(Arc::clone(&backends.queue));

    let sessions = SessionManager::new(
        Arc::clone(&backends.users),
        Arc::clone(&backends.cache),
        hasher.clone(),
        &config.auth,
    );
    let users = UserService::new(Arc::clone(&backends.users), hasher, jobs.clone());
    let files = FileService::new(
        Arc::clone(&backends.files),
        backends.storage.clone(),
        jobs,
        config.storage.thumbnail_widths.clone(),
    );
    let app = AppService::new(
        Arc::clone(&backends.users),
        Arc::clone(&backends.files),
        Arc::clone(&backends.cache),
    );

    Ok(AppState {
        config: Arc::new(config),
        sessions: Arc::new(sessions),
        users: Arc::new(users),
        files: Arc::new(files),
        app: Arc::new(app),
    })
}

/// Register the consumer of every queue.
pub fn build_executor(config: &AppConfig, backends: &Backends) -> AppResult<JobExecutor> {
    let mut executor = JobExecutor::new();
    executor.register(Arc::new(FileThumbnailJob::new(
        Arc::clone(&backends.files),
        ThumbnailGenerator::new(backends.storage.clone()),
        config.storage.thumbnail_widths.clone(),
    )))?;
    executor.register(Arc::new(WelcomeEmailJob::new(
        Arc::clone(&backends.users),
        Arc::new(LogNotifier),
    )))?;
    Ok(executor)
}

/// Identifier of this process's worker, recorded on claimed jobs.
pub fn worker_id() -> String {
    let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
    format!("{host}-{}", std::process::id())
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}
