//! Thumbnail generation for uploaded images.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use files_core::error::AppError;
use files_core::traits::queue::Delivery;
use files_database::FileStore;
use files_entity::job::{JobKind, ThumbnailPayload};
use files_storage::ThumbnailGenerator;

use crate::executor::{JobExecutionError, JobHandler};

/// Consumes `file_thumbnail`: writes one width-bounded copy of the image
/// per configured width, beside the original as `<path>_<width>`.
#[derive(Debug)]
pub struct FileThumbnailJob {
    files: Arc<dyn FileStore>,
    generator: ThumbnailGenerator,
    widths: Vec<u32>,
}

impl FileThumbnailJob {
    /// Create the handler.
    pub fn new(files: Arc<dyn FileStore>, generator: ThumbnailGenerator, widths: Vec<u32>) -> Self {
        Self {
            files,
            generator,
            widths,
        }
    }
}

#[async_trait]
impl JobHandler for FileThumbnailJob {
    fn kind(&self) -> JobKind {
        JobKind::FileThumbnail
    }

    async fn execute(&self, job: &Delivery) -> Result<Option<Value>, JobExecutionError> {
        tracing::debug!(job_id = %job.id, stage = "received", "Thumbnail job");

        let payload: ThumbnailPayload = serde_json::from_value(job.payload.clone())
            .map_err(|e| {
                JobExecutionError::Permanent(AppError::validation(format!(
                    "Invalid thumbnail payload: {e}"
                )))
            })?;
        let file_id = payload
            .file_id
            .ok_or_else(|| JobExecutionError::Permanent(AppError::missing_field("fileId")))?;
        let user_id = payload
            .user_id
            .ok_or_else(|| JobExecutionError::Permanent(AppError::missing_field("userId")))?;

        let file = self
            .files
            .find_owned(file_id, user_id)
            .await?
            .ok_or_else(|| JobExecutionError::Permanent(AppError::not_found("File not found")))?;
        let source = file.local_path.ok_or_else(|| {
            JobExecutionError::Permanent(AppError::validation("File has no content"))
        })?;

        tracing::debug!(job_id = %job.id, %file_id, stage = "validated", "Thumbnail job");
        tracing::debug!(job_id = %job.id, %file_id, stage = "processing", "Thumbnail job");

        let mut generated = Vec::new();
        let mut failed = Vec::new();
        for &width in &self.widths {
            match self.generator.generate(&source, width).await {
                Ok(path) => generated.push(json!({ "width": width, "path": path })),
                Err(e) => {
                    tracing::warn!(%file_id, width, error = %e, "Thumbnail generation failed");
                    failed.push(width);
                }
            }
        }

        tracing::info!(
            job_id = %job.id,
            %file_id,
            generated = generated.len(),
            failed = failed.len(),
            stage = "done",
            "Thumbnail job"
        );

        Ok(Some(json!({ "generated": generated, "failed": failed })))
    }
}
