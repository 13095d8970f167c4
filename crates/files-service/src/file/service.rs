//! File service: upload, lookup, listing, visibility, and content reads.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use tracing::info;

use files_core::error::AppError;
use files_core::result::AppResult;
use files_core::types::{FileId, PageRequest, UserId};
use files_database::store::FileStore;
use files_entity::file::{File, FileType, NewFile, parent};
use files_storage::{ByteStream, LocalStorageProvider, thumbnail_path};

use crate::dispatch::JobDispatcher;

/// Upload parameters as received from the client.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Display name.
    pub name: Option<String>,
    /// `folder`, `file`, or `image`.
    pub file_type: Option<String>,
    /// Containing folder id; absent or `0` for the root.
    pub parent_id: Option<String>,
    /// Initial visibility, private when absent.
    pub is_public: Option<bool>,
    /// Base64 content, required unless uploading a folder.
    pub data: Option<String>,
}

/// Content of a readable file.
pub struct FileContent {
    /// Name of the file record.
    pub name: String,
    /// MIME type guessed from the name.
    pub content_type: String,
    /// The bytes.
    pub body: ByteStream,
}

impl std::fmt::Debug for FileContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileContent")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Handles the `/files` use cases.
#[derive(Clone)]
pub struct FileService {
    files: Arc<dyn FileStore>,
    storage: LocalStorageProvider,
    jobs: JobDispatcher,
    thumbnail_widths: Vec<u32>,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService")
            .field("root", &self.storage.root())
            .finish()
    }
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<dyn FileStore>,
        storage: LocalStorageProvider,
        jobs: JobDispatcher,
        thumbnail_widths: Vec<u32>,
    ) -> Self {
        Self {
            files,
            storage,
            jobs,
            thumbnail_widths,
        }
    }

    /// Creates a folder, or stores content and creates a file or image.
    ///
    /// Images additionally get a thumbnail job.
    pub async fn upload(&self, user_id: UserId, req: UploadRequest) -> AppResult<File> {
        let name = req
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::missing_field("name"))?;
        let file_type = req
            .file_type
            .as_deref()
            .and_then(|t| t.parse::<FileType>().ok())
            .ok_or_else(|| AppError::missing_field("type"))?;
        let data = match (file_type.has_content(), req.data) {
            (true, None) => return Err(AppError::missing_field("data")),
            (_, data) => data,
        };

        let parent_id = match req.parent_id.as_deref() {
            None => None,
            Some(raw) => {
                let parent_id = parent::parse(raw)
                    .ok_or_else(|| AppError::validation("Parent not found"))?;
                if let Some(id) = parent_id {
                    let folder = self
                        .files
                        .find_owned(id, user_id)
                        .await?
                        .ok_or_else(|| AppError::validation("Parent not found"))?;
                    if folder.file_type != FileType::Folder {
                        return Err(AppError::validation("Parent is not a folder"));
                    }
                }
                parent_id
            }
        };

        let local_path = match (file_type.has_content(), data) {
            (true, Some(data)) => {
                let bytes = STANDARD
                    .decode(data.as_bytes())
                    .map_err(|_| AppError::validation("Invalid data"))?;
                Some(self.storage.store(Bytes::from(bytes)).await?)
            }
            _ => None,
        };

        let file = self
            .files
            .insert(NewFile {
                user_id,
                name,
                file_type,
                is_public: req.is_public.unwrap_or(false),
                parent_id,
                local_path,
            })
            .await?;

        info!(file_id = %file.id, %user_id, file_type = %file.file_type, "File created");

        if file.file_type == FileType::Image {
            if let Err(e) = self.jobs.enqueue_thumbnail(file.id, user_id).await {
                tracing::error!(file_id = %file.id, error = %e, "Failed to enqueue thumbnail job");
                return Err(e);
            }
        }

        Ok(file)
    }

    /// An owned record.
    pub async fn show(&self, user_id: UserId, id: FileId) -> AppResult<File> {
        self.files
            .find_owned(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Not found"))
    }

    /// One page of the user's records under `parent_id` (root when `None`).
    pub async fn index(
        &self,
        user_id: UserId,
        parent_id: Option<FileId>,
        page: PageRequest,
    ) -> AppResult<Vec<File>> {
        self.files.list_by_parent(user_id, parent_id, page).await
    }

    /// Makes an owned record readable by anyone.
    pub async fn publish(&self, user_id: UserId, id: FileId) -> AppResult<File> {
        self.set_public(user_id, id, true).await
    }

    /// Makes an owned record readable by its owner only.
    pub async fn unpublish(&self, user_id: UserId, id: FileId) -> AppResult<File> {
        self.set_public(user_id, id, false).await
    }

    async fn set_public(&self, user_id: UserId, id: FileId, is_public: bool) -> AppResult<File> {
        let file = self
            .files
            .set_public(id, user_id, is_public)
            .await?
            .ok_or_else(|| AppError::not_found("Not found"))?;
        info!(file_id = %id, is_public, "File visibility changed");
        Ok(file)
    }

    /// Content of a public file, or of a private file read by its owner.
    ///
    /// `size` selects one of the generated thumbnails.
    pub async fn data(
        &self,
        viewer: Option<UserId>,
        id: FileId,
        size: Option<u32>,
    ) -> AppResult<FileContent> {
        let file = self
            .files
            .find_by_id(id)
            .await?
            .filter(|f| f.readable_by(viewer))
            .ok_or_else(|| AppError::not_found("Not found"))?;

        if file.file_type == FileType::Folder {
            return Err(AppError::validation("A folder doesn't have content"));
        }

        let source = file
            .local_path
            .as_deref()
            .ok_or_else(|| AppError::not_found("Not found"))?;
        let path = match size {
            None => source.to_string(),
            Some(width) if self.thumbnail_widths.contains(&width) => thumbnail_path(source, width),
            Some(_) => return Err(AppError::not_found("Not found")),
        };

        let body = self.storage.read(&path).await?;
        let content_type = mime_guess::from_path(&file.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(FileContent {
            name: file.name,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;

    use files_core::error::ErrorKind;
    use files_database::MemoryFileStore;
    use files_worker::MemoryQueueBackend;

    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        queue: Arc<MemoryQueueBackend>,
        svc: FileService,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        let queue = Arc::new(MemoryQueueBackend::new());
        let svc = FileService::new(
            Arc::new(MemoryFileStore::new()),
            storage,
            JobDispatcher::new(queue.clone()),
            vec![500, 250, 100],
        );
        Fixture {
            _dir: dir,
            queue,
            svc,
        }
    }

    fn upload(name: &str, file_type: &str, data: Option<&str>) -> UploadRequest {
        UploadRequest {
            name: Some(name.to_string()),
            file_type: Some(file_type.to_string()),
            data: data.map(|d| STANDARD.encode(d)),
            ..UploadRequest::default()
        }
    }

    async fn read_all(content: FileContent) -> Vec<u8> {
        let chunks: Vec<Bytes> = content.body.try_collect().await.unwrap();
        chunks.concat()
    }

    #[tokio::test]
    async fn test_upload_validation_order() {
        let fx = fixture().await;
        let user = UserId::new();

        let err = fx.svc.upload(user, UploadRequest::default()).await.unwrap_err();
        assert_eq!(err.message, "Missing name");

        let mut req = upload("a.txt", "video", None);
        let err = fx.svc.upload(user, req.clone()).await.unwrap_err();
        assert_eq!(err.message, "Missing type");

        req.file_type = Some("file".into());
        let err = fx.svc.upload(user, req).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingField);
        assert_eq!(err.message, "Missing data");
    }

    #[tokio::test]
    async fn test_upload_into_folder() {
        let fx = fixture().await;
        let user = UserId::new();

        let folder = fx.svc.upload(user, upload("docs", "folder", None)).await.unwrap();
        assert!(folder.local_path.is_none());

        let mut req = upload("a.txt", "file", Some("hello"));
        req.parent_id = Some(folder.id.to_string());
        let file = fx.svc.upload(user, req).await.unwrap();
        assert_eq!(file.parent_id, Some(folder.id));
        assert!(!file.is_public);

        let listed = fx
            .svc
            .index(user, Some(folder.id), PageRequest::new(0))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, file.id);

        let root = fx.svc.index(user, None, PageRequest::new(0)).await.unwrap();
        assert_eq!(root.len(), 1);
        assert_eq!(root[0].id, folder.id);
    }

    #[tokio::test]
    async fn test_upload_parent_checks() {
        let fx = fixture().await;
        let user = UserId::new();
        let file = fx
            .svc
            .upload(user, upload("a.txt", "file", Some("x")))
            .await
            .unwrap();

        let mut req = upload("b.txt", "file", Some("y"));
        req.parent_id = Some(file.id.to_string());
        let err = fx.svc.upload(user, req.clone()).await.unwrap_err();
        assert_eq!(err.message, "Parent is not a folder");

        req.parent_id = Some(FileId::new().to_string());
        let err = fx.svc.upload(user, req.clone()).await.unwrap_err();
        assert_eq!(err.message, "Parent not found");

        req.parent_id = Some("0".into());
        assert!(fx.svc.upload(user, req).await.unwrap().parent_id.is_none());
    }

    #[tokio::test]
    async fn test_image_upload_enqueues_thumbnail() {
        let fx = fixture().await;
        let user = UserId::new();
        fx.svc
            .upload(user, upload("a.txt", "file", Some("x")))
            .await
            .unwrap();
        assert_eq!(fx.queue.pending("file_thumbnail"), 0);

        fx.svc
            .upload(user, upload("a.png", "image", Some("png bytes")))
            .await
            .unwrap();
        assert_eq!(fx.queue.pending("file_thumbnail"), 1);
    }

    #[tokio::test]
    async fn test_show_and_publish_require_ownership() {
        let fx = fixture().await;
        let owner = UserId::new();
        let other = UserId::new();
        let file = fx
            .svc
            .upload(owner, upload("a.txt", "file", Some("x")))
            .await
            .unwrap();

        assert_eq!(fx.svc.show(owner, file.id).await.unwrap().id, file.id);
        assert_eq!(
            fx.svc.show(other, file.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            fx.svc.publish(other, file.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert!(fx.svc.publish(owner, file.id).await.unwrap().is_public);
        assert!(!fx.svc.unpublish(owner, file.id).await.unwrap().is_public);
    }

    #[tokio::test]
    async fn test_data_visibility() {
        let fx = fixture().await;
        let owner = UserId::new();
        let file = fx
            .svc
            .upload(owner, upload("notes.txt", "file", Some("Hello Webstack!\n")))
            .await
            .unwrap();

        let content = fx.svc.data(Some(owner), file.id, None).await.unwrap();
        assert_eq!(content.content_type, "text/plain");
        assert_eq!(read_all(content).await, b"Hello Webstack!\n");

        let err = fx.svc.data(None, file.id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = fx.svc.data(Some(UserId::new()), file.id, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        fx.svc.publish(owner, file.id).await.unwrap();
        assert!(fx.svc.data(None, file.id, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_data_folder_and_missing_thumbnail() {
        let fx = fixture().await;
        let owner = UserId::new();
        let folder = fx
            .svc
            .upload(owner, upload("docs", "folder", None))
            .await
            .unwrap();
        let err = fx.svc.data(Some(owner), folder.id, None).await.unwrap_err();
        assert_eq!(err.message, "A folder doesn't have content");

        let image = fx
            .svc
            .upload(owner, upload("a.png", "image", Some("png bytes")))
            .await
            .unwrap();
        let err = fx.svc.data(Some(owner), image.id, Some(250)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = fx.svc.data(Some(owner), image.id, Some(42)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
