//! Key/value store with per-key expiry, used for session tokens.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// A string-to-string cache.
///
/// Implementations own expiry: once a key's TTL has elapsed, `get` must
/// answer `None` and `delete` must answer `false`, whether or not the entry
/// has been physically evicted yet.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// The live value under `key`.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key` for `ttl`, replacing any previous value
    /// and its deadline.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Remove `key`. `true` if a live entry was removed.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Whether the backend answers.
    async fn health_check(&self) -> AppResult<bool>;
}
