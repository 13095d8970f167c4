//! In-memory file store.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use files_core::result::AppResult;
use files_core::types::{FileId, PageRequest, UserId};
use files_entity::file::{File, NewFile};

use crate::store::FileStore;

/// [`FileStore`] held in process memory.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    /// Records keyed by id, each tagged with its insertion sequence.
    files: DashMap<FileId, (u64, File)>,
    seq: AtomicU64,
}

impl MemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn insert(&self, data: NewFile) -> AppResult<File> {
        let file = File {
            id: FileId::new(),
            user_id: data.user_id,
            name: data.name,
            file_type: data.file_type,
            is_public: data.is_public,
            parent_id: data.parent_id,
            local_path: data.local_path,
            created_at: Utc::now(),
        };
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.files.insert(file.id, (seq, file.clone()));
        Ok(file)
    }

    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.files.get(&id).map(|entry| entry.value().1.clone()))
    }

    async fn find_owned(&self, id: FileId, user_id: UserId) -> AppResult<Option<File>> {
        Ok(self
            .find_by_id(id)
            .await?
            .filter(|file| file.is_owned_by(user_id)))
    }

    async fn list_by_parent(
        &self,
        user_id: UserId,
        parent: Option<FileId>,
        page: PageRequest,
    ) -> AppResult<Vec<File>> {
        let mut matches: Vec<(u64, File)> = self
            .files
            .iter()
            .filter(|entry| {
                let file = &entry.value().1;
                file.user_id == user_id && file.parent_id == parent
            })
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|(seq, _)| *seq);

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(matches
            .into_iter()
            .skip(offset)
            .take(page.limit() as usize)
            .map(|(_, file)| file)
            .collect())
    }

    async fn set_public(&self, id: FileId, user_id: UserId, is_public: bool) -> AppResult<Option<File>> {
        Ok(self.files.get_mut(&id).and_then(|mut entry| {
            let file = &mut entry.value_mut().1;
            if !file.is_owned_by(user_id) {
                return None;
            }
            file.is_public = is_public;
            Some(file.clone())
        }))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.files.len() as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
