//! Typed path parameter helpers.

use files_core::error::AppError;
use files_core::types::FileId;

/// Parses a file id from a path segment. Malformed ids cannot name an
/// existing file, so they are reported as not found.
pub fn parse_file_id(s: &str) -> Result<FileId, AppError> {
    s.parse().map_err(|_| AppError::not_found("Not found"))
}
