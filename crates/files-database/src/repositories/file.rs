//! File repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use files_core::error::{AppError, ErrorKind};
use files_core::result::AppResult;
use files_core::types::{FileId, PageRequest, UserId};
use files_entity::file::{File, NewFile};

use crate::store::FileStore;

/// PostgreSQL-backed [`FileStore`].
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn insert(&self, data: NewFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, user_id, name, file_type, is_public, parent_id, local_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(FileId::new())
        .bind(data.user_id)
        .bind(&data.name)
        .bind(data.file_type)
        .bind(data.is_public)
        .bind(data.parent_id)
        .bind(&data.local_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_owned(&self, id: FileId, user_id: UserId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn list_by_parent(
        &self,
        user_id: UserId,
        parent: Option<FileId>,
        page: PageRequest,
    ) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE user_id = $1 AND parent_id IS NOT DISTINCT FROM $2 \
             ORDER BY created_at ASC, id ASC LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(parent)
        .bind(page.limit() as i64)
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn set_public(&self, id: FileId, user_id: UserId, is_public: bool) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET is_public = $3 WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(is_public)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file visibility", e))
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))?;
        Ok(total.max(0) as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        crate::connection::ping(&self.pool).await
    }
}
