//! Request DTOs.

use serde::Deserialize;
use serde_json::Value;

use files_service::UploadRequest;

/// Body of `POST /users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// Plaintext password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `POST /files`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileRequest {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// `folder`, `file`, or `image`.
    #[serde(default, rename = "type")]
    pub file_type: Option<String>,
    /// Parent folder id, `0` for the root. Either a number or a string.
    #[serde(default)]
    pub parent_id: Option<Value>,
    /// Initial visibility.
    #[serde(default)]
    pub is_public: Option<bool>,
    /// Base64 content.
    #[serde(default)]
    pub data: Option<String>,
}

impl From<UploadFileRequest> for UploadRequest {
    fn from(req: UploadFileRequest) -> Self {
        let parent_id = match req.parent_id {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };
        UploadRequest {
            name: req.name,
            file_type: req.file_type,
            parent_id,
            is_public: req.is_public,
            data: req.data,
        }
    }
}

/// Query of `GET /files`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesQuery {
    /// Parent folder id, `0` or absent for the root.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Zero-based page; unparsable values mean the first page.
    #[serde(default)]
    pub page: Option<String>,
}

/// Query of `/files/{id}/data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataQuery {
    /// Thumbnail width.
    #[serde(default)]
    pub size: Option<String>,
}
