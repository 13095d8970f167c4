//! Session cache settings.

use serde::{Deserialize, Serialize};

/// Which cache holds session tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local; sessions die with the process.
    #[default]
    Memory,
    /// Shared Redis instance.
    Redis,
}

/// The `[cache]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub provider: CacheBackend,
    /// Used when `provider = "redis"`.
    #[serde(default)]
    pub redis: RedisCacheConfig,
    /// Used when `provider = "memory"`.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
}

/// `[cache.redis]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

/// `[cache.memory]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Upper bound on live sessions; the least recently used are evicted.
    #[serde(default = "default_max_entries")]
    pub max_capacity: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_entries(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".into()
}

fn default_max_entries() -> u64 {
    100_000
}
