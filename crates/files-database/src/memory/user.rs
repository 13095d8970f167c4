//! In-memory user store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use files_core::error::AppError;
use files_core::result::AppResult;
use files_core::types::UserId;
use files_entity::user::{NewUser, User};

use crate::store::{DUPLICATE_EMAIL, UserStore};

/// [`UserStore`] held in process memory.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<UserId, User>,
    /// Unique email index; the entry lock makes insert atomic per email.
    by_email: DashMap<String, UserId>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, data: NewUser) -> AppResult<User> {
        match self.by_email.entry(data.email.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(DUPLICATE_EMAIL)),
            Entry::Vacant(slot) => {
                let user = User {
                    id: UserId::new(),
                    email: data.email,
                    password_digest: data.password_digest,
                    created_at: Utc::now(),
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.by_email.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
