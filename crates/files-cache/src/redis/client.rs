//! Redis connection management.

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use files_core::config::cache::RedisCacheConfig;
use files_core::config::redact_url;
use files_core::error::{AppError, ErrorKind};
use files_core::result::AppResult;

/// A reconnecting, multiplexed Redis connection. Clones share it.
#[derive(Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
    /// Redacted, for `Debug`.
    url: String,
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl RedisClient {
    /// Connect and keep the connection open for the process lifetime.
    pub async fn connect(config: &RedisCacheConfig) -> AppResult<Self> {
        let url = redact_url(&config.url);
        info!(%url, "Connecting to Redis");

        let client = Client::open(config.url.as_str())
            .map_err(|e| AppError::with_source(ErrorKind::Cache, "Invalid Redis URL", e))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Cache, "Redis unreachable", e))?;

        Ok(Self { conn, url })
    }

    /// A handle to the shared connection.
    pub fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}
