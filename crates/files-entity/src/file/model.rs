//! File entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use files_core::types::{FileId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Kind of a file record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// A container for other records. Has no content.
    Folder,
    /// Arbitrary content.
    File,
    /// Image content; thumbnails are generated after upload.
    Image,
}

impl FileType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::File => "file",
            Self::Image => "image",
        }
    }

    /// Whether records of this type carry content on disk.
    pub fn has_content(&self) -> bool {
        !matches!(self, Self::Folder)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folder" => Ok(Self::Folder),
            "file" => Ok(Self::File),
            "image" => Ok(Self::Image),
            other => Err(format!("unknown file type '{other}'")),
        }
    }
}

/// A file or folder owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The owner.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Folder, plain file, or image.
    pub file_type: FileType,
    /// Whether anyone may read the content.
    pub is_public: bool,
    /// Containing folder, `None` at the root.
    pub parent_id: Option<FileId>,
    /// Absolute path of the content on disk. `None` for folders.
    pub local_path: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl File {
    /// Whether `user_id` owns this record.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Whether `viewer` may read this record's content.
    pub fn readable_by(&self, viewer: Option<UserId>) -> bool {
        self.is_public || viewer.is_some_and(|id| self.is_owned_by(id))
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// The owner.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Folder, plain file, or image.
    pub file_type: FileType,
    /// Initial visibility.
    pub is_public: bool,
    /// Containing folder, `None` at the root.
    pub parent_id: Option<FileId>,
    /// Content location for non-folders.
    pub local_path: Option<String>,
}
