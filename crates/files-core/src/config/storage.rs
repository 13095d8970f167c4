//! Storage configuration.

use serde::{Deserialize, Serialize};

/// Local file storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory that receives uploaded file bodies.
    #[serde(default = "default_folder_path")]
    pub folder_path: String,
    /// Thumbnail widths generated for uploaded images, in pixels.
    #[serde(default = "default_thumbnail_widths")]
    pub thumbnail_widths: Vec<u32>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            folder_path: default_folder_path(),
            thumbnail_widths: default_thumbnail_widths(),
        }
    }
}

fn default_folder_path() -> String {
    "/tmp/files_manager".to_string()
}

fn default_thumbnail_widths() -> Vec<u32> {
    vec![500, 250, 100]
}
