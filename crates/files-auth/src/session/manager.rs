//! Session lifecycle manager: login, logout, and token resolution.
//!
//! A session is a single cache entry `auth_<token>` holding the user id,
//! written with a fixed TTL. The cache's expiry is the only thing that ends
//! a session besides logout; resolution never extends it.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use files_cache::keys;
use files_core::config::auth::AuthConfig;
use files_core::error::AppError;
use files_core::result::AppResult;
use files_core::traits::cache::CacheProvider;
use files_core::types::UserId;
use files_database::store::UserStore;

use crate::credentials::BasicCredentials;
use crate::password::PasswordHasher;

/// Issues, resolves, and revokes session tokens.
#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    cache: Arc<dyn CacheProvider>,
    hasher: PasswordHasher,
    ttl: Duration,
    key_prefix: String,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager over the given user store and cache.
    pub fn new(
        users: Arc<dyn UserStore>,
        cache: Arc<dyn CacheProvider>,
        hasher: PasswordHasher,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            cache,
            hasher,
            ttl: config.session_ttl(),
            key_prefix: config.token_key_prefix.clone(),
        }
    }

    fn key(&self, token: &str) -> String {
        keys::session(&self.key_prefix, token)
    }

    /// Exchanges a Basic authorization header for a new session token.
    ///
    /// A missing or malformed header, an unknown email, and a wrong password
    /// all yield the same `Unauthenticated` error.
    pub async fn login(&self, authorization: Option<&str>) -> AppResult<String> {
        let credentials = authorization
            .and_then(BasicCredentials::parse)
            .ok_or_else(AppError::unauthenticated)?;

        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            debug!("Login attempt for unknown email");
            return Err(AppError::unauthenticated());
        };

        let hasher = self.hasher.clone();
        let password = credentials.password;
        let digest = user.password_digest.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AppError::internal(format!("Password verify task failed: {e}")))??;
        if !matches {
            debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::unauthenticated());
        }

        let token = Uuid::new_v4().to_string();
        self.cache
            .set(&self.key(&token), &user.id.to_string(), self.ttl)
            .await?;

        info!(user_id = %user.id, "Session opened");
        Ok(token)
    }

    /// Revokes a session. Fails with `Unauthenticated` if the token is
    /// absent, unknown, or already expired.
    pub async fn logout(&self, token: Option<&str>) -> AppResult<()> {
        let token = non_empty(token)?;
        if !self.cache.delete(&self.key(token)).await? {
            return Err(AppError::unauthenticated());
        }
        info!("Session closed");
        Ok(())
    }

    /// Returns the user id bound to a live session token.
    pub async fn resolve_session(&self, token: Option<&str>) -> AppResult<UserId> {
        let token = non_empty(token)?;
        let raw = self
            .cache
            .get(&self.key(token))
            .await?
            .ok_or_else(AppError::unauthenticated)?;

        raw.parse().map_err(|_| {
            warn!(value = %raw, "Session entry does not hold a user id");
            AppError::unauthenticated()
        })
    }
}

fn non_empty(token: Option<&str>) -> AppResult<&str> {
    token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(AppError::unauthenticated)
}
