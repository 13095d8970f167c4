//! Account registration and self lookup.

use std::sync::Arc;

use tracing::info;

use files_auth::PasswordHasher;
use files_core::error::AppError;
use files_core::result::AppResult;
use files_core::types::UserId;
use files_database::store::{DUPLICATE_EMAIL, UserStore};
use files_entity::user::{NewUser, UserProfile};

use crate::dispatch::JobDispatcher;

/// Handles user registration and profile lookup.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    jobs: JobDispatcher,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, jobs: JobDispatcher) -> Self {
        Self {
            users,
            hasher,
            jobs,
        }
    }

    /// Registers a new account and asks for its welcome notification.
    ///
    /// The existence check only produces the friendly error; the store's
    /// unique email constraint is what rejects a racing duplicate.
    pub async fn register(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> AppResult<UserProfile> {
        let email = email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::missing_field("email"))?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::missing_field("password"))?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict(DUPLICATE_EMAIL));
        }

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let password_digest = tokio::task::spawn_blocking(move || hasher.digest(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password digest task failed: {e}")))??;

        let user = self
            .users
            .insert(NewUser {
                email: email.to_string(),
                password_digest,
            })
            .await?;

        info!(user_id = %user.id, "User registered");

        if let Err(e) = self.jobs.enqueue_welcome(user.id).await {
            tracing::error!(user_id = %user.id, error = %e, "Failed to enqueue welcome job");
            return Err(e);
        }

        Ok(user.profile())
    }

    /// Returns `{id, email}` of an already resolved session user.
    pub async fn get_self(&self, user_id: UserId) -> AppResult<UserProfile> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|user| user.profile())
            .ok_or_else(AppError::unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use files_auth::SessionManager;
    use files_cache::memory::MemoryCacheProvider;
    use files_core::config::auth::AuthConfig;
    use files_core::error::ErrorKind;
    use files_core::traits::QueueBackend;
    use files_database::MemoryUserStore;
    use files_entity::user::User;
    use files_worker::MemoryQueueBackend;
    use tokio::sync::Barrier;

    use super::*;

    fn fast_auth() -> AuthConfig {
        AuthConfig {
            password_memory_kib: 1024,
            password_iterations: 1,
            ..AuthConfig::default()
        }
    }

    fn service(users: Arc<dyn UserStore>, queue: Arc<MemoryQueueBackend>) -> UserService {
        let hasher = PasswordHasher::new(&fast_auth()).unwrap();
        UserService::new(users, hasher, JobDispatcher::new(queue))
    }

    #[tokio::test]
    async fn test_register_enqueues_welcome() {
        let users = Arc::new(MemoryUserStore::new());
        let queue = Arc::new(MemoryQueueBackend::new());
        let svc = service(users.clone(), queue.clone());

        let profile = svc
            .register(Some("bob@dylan.com"), Some("toto1234!"))
            .await
            .unwrap();
        assert_eq!(profile.email, "bob@dylan.com");

        let stored = users.find_by_id(profile.id).await.unwrap().unwrap();
        assert_ne!(stored.password_digest, "toto1234!");
        assert_eq!(queue.pending("welcome_email"), 1);
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let svc = service(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryQueueBackend::new()),
        );

        let err = svc.register(Some(""), Some("x")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingField);
        assert_eq!(err.message, "Missing email");

        let err = svc.register(Some("a@b.com"), Some("")).await.unwrap_err();
        assert_eq!(err.message, "Missing password");

        let err = svc.register(None, None).await.unwrap_err();
        assert_eq!(err.message, "Missing email");
    }

    #[tokio::test]
    async fn test_duplicate_keeps_first_digest() {
        let users = Arc::new(MemoryUserStore::new());
        let queue = Arc::new(MemoryQueueBackend::new());
        let svc = service(users.clone(), queue.clone());

        let first = svc.register(Some("a@b.com"), Some("one")).await.unwrap();
        let digest = users
            .find_by_id(first.id)
            .await
            .unwrap()
            .unwrap()
            .password_digest;

        let err = svc.register(Some("a@b.com"), Some("two")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Already exist");

        let after = users.find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(after.password_digest, digest);
        assert_eq!(queue.pending("welcome_email"), 1);
    }

    /// Parks every email lookup until two callers have done theirs, so both
    /// registrations pass the existence check before either inserts.
    #[derive(Debug)]
    struct Interleaved {
        inner: MemoryUserStore,
        barrier: Barrier,
    }

    #[async_trait]
    impl UserStore for Interleaved {
        async fn insert(&self, data: NewUser) -> AppResult<User> {
            self.inner.insert(data).await
        }
        async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
            self.inner.find_by_id(id).await
        }
        async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
            let found = self.inner.find_by_email(email).await;
            self.barrier.wait().await;
            found
        }
        async fn count(&self) -> AppResult<u64> {
            self.inner.count().await
        }
        async fn health_check(&self) -> AppResult<bool> {
            self.inner.health_check().await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_registration_creates_one_user() {
        let store = Arc::new(Interleaved {
            inner: MemoryUserStore::new(),
            barrier: Barrier::new(2),
        });
        let svc = service(store.clone(), Arc::new(MemoryQueueBackend::new()));

        let (a, b) = tokio::join!(
            svc.register(Some("race@b.com"), Some("p1")),
            svc.register(Some("race@b.com"), Some("p2")),
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let err = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_login_get_self_round_trip() {
        let users = Arc::new(MemoryUserStore::new());
        let svc = service(users.clone(), Arc::new(MemoryQueueBackend::new()));
        let registered = svc
            .register(Some("bob@dylan.com"), Some("toto1234!"))
            .await
            .unwrap();

        let sessions = SessionManager::new(
            users,
            Arc::new(MemoryCacheProvider::default()),
            PasswordHasher::new(&fast_auth()).unwrap(),
            &fast_auth(),
        );
        let header = files_auth::BasicCredentials {
            email: "bob@dylan.com".into(),
            password: "toto1234!".into(),
        }
        .to_header();
        let token = sessions.login(Some(&header)).await.unwrap();
        let user_id = sessions.resolve_session(Some(&token)).await.unwrap();

        assert_eq!(svc.get_self(user_id).await.unwrap(), registered);
    }

    #[tokio::test]
    async fn test_refused_welcome_surfaces() {
        #[derive(Debug)]
        struct Closed;

        #[async_trait]
        impl QueueBackend for Closed {
            async fn push(&self, _: &str, _: serde_json::Value) -> AppResult<files_core::types::JobId> {
                Err(AppError::queue("broker unavailable"))
            }
            async fn pop(&self, _: &str, _: &str) -> AppResult<Option<files_core::traits::Delivery>> {
                Ok(None)
            }
            async fn complete(&self, _: files_core::types::JobId) -> AppResult<()> {
                Ok(())
            }
            async fn fail(&self, _: files_core::types::JobId, _: &str, _: bool) -> AppResult<()> {
                Ok(())
            }
            async fn state(
                &self,
                _: files_core::types::JobId,
            ) -> AppResult<Option<files_core::traits::JobState>> {
                Ok(None)
            }
            async fn recover_stale(&self, _: std::time::Duration) -> AppResult<u64> {
                Ok(0)
            }
            async fn health_check(&self) -> AppResult<bool> {
                Ok(false)
            }
        }

        let hasher = PasswordHasher::new(&fast_auth()).unwrap();
        let svc = UserService::new(
            Arc::new(MemoryUserStore::new()),
            hasher,
            JobDispatcher::new(Arc::new(Closed)),
        );
        let err = svc.register(Some("a@b.com"), Some("x")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Queue);
    }
}
