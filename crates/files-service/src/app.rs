//! Liveness of the collaborators and record counts.

use std::sync::Arc;

use serde::Serialize;

use files_core::result::AppResult;
use files_core::traits::cache::CacheProvider;
use files_database::store::{FileStore, UserStore};

/// `{redis, db}` as returned by `/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppStatus {
    /// Whether the cache answers.
    pub redis: bool,
    /// Whether the document store answers.
    pub db: bool,
}

/// `{users, files}` as returned by `/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppStats {
    /// Registered users.
    pub users: u64,
    /// File records, folders included.
    pub files: u64,
}

/// Reports on the health and size of the application.
#[derive(Clone)]
pub struct AppService {
    users: Arc<dyn UserStore>,
    files: Arc<dyn FileStore>,
    cache: Arc<dyn CacheProvider>,
}

impl std::fmt::Debug for AppService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppService").finish()
    }
}

impl AppService {
    /// Creates a new app service.
    pub fn new(
        users: Arc<dyn UserStore>,
        files: Arc<dyn FileStore>,
        cache: Arc<dyn CacheProvider>,
    ) -> Self {
        Self {
            users,
            files,
            cache,
        }
    }

    /// A failing check reports `false` rather than an error.
    pub async fn status(&self) -> AppStatus {
        let (redis, db) = tokio::join!(self.cache.health_check(), self.users.health_check());
        AppStatus {
            redis: redis.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Cache health check failed");
                false
            }),
            db: db.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Store health check failed");
                false
            }),
        }
    }

    /// Counts users and files.
    pub async fn stats(&self) -> AppResult<AppStats> {
        let (users, files) = tokio::try_join!(self.users.count(), self.files.count())?;
        Ok(AppStats { users, files })
    }
}
