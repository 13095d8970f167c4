//! In-memory cache implementation using the moka crate.
//!
//! Each entry carries its own deadline measured on the tokio clock, so
//! expiry is exact per key and follows `tokio::time::pause`/`advance` in
//! tests. moka evicts expired entries in the background using the same TTL.

use std::time::Duration;

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tokio::time::Instant;

use files_core::config::cache::MemoryCacheConfig;
use files_core::result::AppResult;
use files_core::traits::cache::CacheProvider;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }

    fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// Hands each entry's own remaining lifetime to moka.
struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(value.remaining())
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: std::time::Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.remaining())
    }
}

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, Entry>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        Self { cache }
    }

    async fn live_entry(&self, key: &str) -> Option<Entry> {
        let entry = self.cache.get(key).await?;
        if entry.is_live() {
            Some(entry)
        } else {
            self.cache.invalidate(key).await;
            None
        }
    }
}

impl Default for MemoryCacheProvider {
    fn default() -> Self {
        Self::new(&MemoryCacheConfig::default())
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live_entry(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        Ok(self
            .cache
            .remove(key)
            .await
            .is_some_and(|entry| entry.is_live()))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
