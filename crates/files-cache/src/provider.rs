//! Cache manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use files_core::config::cache::{CacheBackend, CacheConfig};
use files_core::error::AppError;
use files_core::result::AppResult;
use files_core::traits::cache::CacheProvider;

/// The session cache selected by `[cache] provider`.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Connect the configured backend. Fails if this build left it out.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn CacheProvider> = match config.provider {
            #[cfg(feature = "redis-backend")]
            CacheBackend::Redis => {
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                info!("Using Redis session cache");
                Arc::new(crate::redis::RedisCacheProvider::new(client))
            }
            #[cfg(feature = "memory")]
            CacheBackend::Memory => {
                info!(
                    max_capacity = config.memory.max_capacity,
                    "Using in-memory session cache"
                );
                Arc::new(crate::memory::MemoryCacheProvider::new(&config.memory))
            }
            #[allow(unreachable_patterns)]
            other => {
                return Err(AppError::configuration(format!(
                    "Cache provider {other:?} is not compiled into this build"
                )));
            }
        };

        Ok(Self { inner })
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
