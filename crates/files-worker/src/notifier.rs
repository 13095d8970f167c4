//! Delivery of welcome notifications.

use async_trait::async_trait;

use files_core::result::AppResult;
use files_entity::user::User;

/// Sends the welcome message to a newly registered user.
#[async_trait]
pub trait WelcomeNotifier: Send + Sync + std::fmt::Debug {
    /// Greet `user`.
    async fn welcome(&self, user: &User) -> AppResult<()>;
}

/// Writes the greeting to the log instead of sending mail.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl WelcomeNotifier for LogNotifier {
    async fn welcome(&self, user: &User) -> AppResult<()> {
        tracing::info!(user_id = %user.id, "Welcome {}!", user.email);
        Ok(())
    }
}
