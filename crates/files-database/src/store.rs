//! Store traits for user and file records.
//!
//! Every method is a single-record operation; the stores offer no
//! multi-record transactions. Email uniqueness is enforced by the store
//! itself, so a racing duplicate insert fails with `ErrorKind::Conflict`
//! even when the caller's existence check passed.

use async_trait::async_trait;

use files_core::result::AppResult;
use files_core::types::{FileId, PageRequest, UserId};
use files_entity::file::{File, NewFile};
use files_entity::user::{NewUser, User};

/// Message carried by a duplicate-email conflict.
pub const DUPLICATE_EMAIL: &str = "Already exist";

/// Durable user records.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a user. Fails with `Conflict` if the email is taken.
    async fn insert(&self, data: NewUser) -> AppResult<User>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by exact email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Number of users.
    async fn count(&self) -> AppResult<u64>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Durable file and folder records.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a file record.
    async fn insert(&self, data: NewFile) -> AppResult<File>;

    /// Find a record by id regardless of owner.
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>>;

    /// Find a record by id only if `user_id` owns it.
    async fn find_owned(&self, id: FileId, user_id: UserId) -> AppResult<Option<File>>;

    /// One page of the user's records directly under `parent` (root when `None`),
    /// oldest first.
    async fn list_by_parent(
        &self,
        user_id: UserId,
        parent: Option<FileId>,
        page: PageRequest,
    ) -> AppResult<Vec<File>>;

    /// Set visibility of an owned record. Returns `None` if not owned.
    async fn set_public(&self, id: FileId, user_id: UserId, is_public: bool) -> AppResult<Option<File>>;

    /// Number of file records, folders included.
    async fn count(&self) -> AppResult<u64>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
