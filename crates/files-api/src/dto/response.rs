//! Response DTOs.

use serde::{Deserialize, Serialize};

use files_core::types::{FileId, UserId};
use files_entity::file::{File, FileType};

/// `{token}` returned by `/connect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque session token for the `X-Token` header.
    pub token: String,
}

/// Public metadata of a file record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    /// File id.
    pub id: FileId,
    /// Owner id.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// `folder`, `file`, or `image`.
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// Whether anyone may read the content.
    pub is_public: bool,
    /// Containing folder, `0` at the root.
    #[serde(with = "files_entity::file::parent")]
    pub parent_id: Option<FileId>,
}

impl From<File> for FileResponse {
    fn from(file: File) -> Self {
        Self {
            id: file.id,
            user_id: file.user_id,
            name: file.name,
            file_type: file.file_type,
            is_public: file.is_public,
            parent_id: file.parent_id,
        }
    }
}
