//! Typed job payload definitions.
//!
//! Fields are optional on the wire so that consumers can report a missing
//! field instead of failing to decode the whole payload.

use files_core::types::{FileId, UserId};
use serde::{Deserialize, Serialize};

/// Payload of a [`JobKind::FileThumbnail`](super::JobKind::FileThumbnail) job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailPayload {
    /// The uploaded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<FileId>,
    /// The uploader; the image must belong to this user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl ThumbnailPayload {
    /// Payload for a freshly uploaded image.
    pub fn new(file_id: FileId, user_id: UserId) -> Self {
        Self {
            file_id: Some(file_id),
            user_id: Some(user_id),
        }
    }
}

/// Payload of a [`JobKind::WelcomeEmail`](super::JobKind::WelcomeEmail) job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomePayload {
    /// The newly registered user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl WelcomePayload {
    /// Payload for a newly registered user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}
