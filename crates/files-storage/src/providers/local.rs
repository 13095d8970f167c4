//! Local filesystem storage provider.
//!
//! New content is written under the root folder with a random name. Reads
//! take the absolute path recorded at write time, so content written under
//! a previous root stays readable after the folder setting changes.

use std::path::{Path, PathBuf};
use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use files_core::error::{AppError, ErrorKind};
use files_core::result::AppResult;

/// A boxed stream of file content chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Folder receiving new content.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a provider rooted at `root_path`, creating the folder if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        let root = fs::canonicalize(&root).await.unwrap_or(root);
        Ok(Self { root })
    }

    /// The folder receiving new content.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store new content under a fresh random name and return its absolute path.
    pub async fn store(&self, data: Bytes) -> AppResult<String> {
        let path = self.root.join(Uuid::new_v4().to_string());
        let path = path.to_string_lossy().into_owned();
        self.write(&path, data).await?;
        Ok(path)
    }

    /// Write `data` to `path`, replacing any existing content.
    pub async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        fs::write(path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {path}"),
                e,
            )
        })?;
        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    /// Read the whole content at `path`.
    pub async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|e| map_read_err(path, e))
    }

    /// Open `path` as a chunk stream.
    pub async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let file = fs::File::open(path)
            .await
            .map_err(|e| map_read_err(path, e))?;
        Ok(Box::pin(ReaderStream::new(file)))
    }
}

fn map_read_err(path: &str, e: std::io::Error) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found("Not found")
    } else {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to read file: {path}"),
            e,
        )
    }
}
