//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Fixed session lifetime in seconds. Sessions never slide.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
    /// Cache key prefix for session entries.
    #[serde(default = "default_token_key_prefix")]
    pub token_key_prefix: String,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_password_memory_kib")]
    pub password_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
}

impl AuthConfig {
    /// Session lifetime as a [`Duration`].
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: default_session_ttl(),
            token_key_prefix: default_token_key_prefix(),
            password_memory_kib: default_password_memory_kib(),
            password_iterations: default_password_iterations(),
        }
    }
}

fn default_session_ttl() -> u64 {
    60 * 60 * 24
}

fn default_token_key_prefix() -> String {
    "auth_".to_string()
}

fn default_password_memory_kib() -> u32 {
    19 * 1024
}

fn default_password_iterations() -> u32 {
    2
}
