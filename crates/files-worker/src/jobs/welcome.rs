//! Welcome notification for newly registered users.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use files_core::error::AppError;
use files_core::traits::queue::Delivery;
use files_database::UserStore;
use files_entity::job::{JobKind, WelcomePayload};

use crate::executor::{JobExecutionError, JobHandler};
use crate::notifier::WelcomeNotifier;

/// Consumes `welcome_email`.
#[derive(Debug)]
pub struct WelcomeEmailJob {
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn WelcomeNotifier>,
}

impl WelcomeEmailJob {
    /// Create the handler.
    pub fn new(users: Arc<dyn UserStore>, notifier: Arc<dyn WelcomeNotifier>) -> Self {
        Self { users, notifier }
    }
}

#[async_trait]
impl JobHandler for WelcomeEmailJob {
    fn kind(&self) -> JobKind {
        JobKind::WelcomeEmail
    }

    async fn execute(&self, job: &Delivery) -> Result<Option<Value>, JobExecutionError> {
        let payload: WelcomePayload = serde_json::from_value(job.payload.clone())
            .map_err(|e| {
                JobExecutionError::Permanent(AppError::validation(format!(
                    "Invalid welcome payload: {e}"
                )))
            })?;
        let user_id = payload
            .user_id
            .ok_or_else(|| JobExecutionError::Permanent(AppError::missing_field("userId")))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| JobExecutionError::Permanent(AppError::not_found("User not found")))?;

        self.notifier
            .welcome(&user)
            .await
            .map_err(|e| JobExecutionError::Transient(e.message))?;

        Ok(None)
    }
}
