//! Thumbnail generator for image files.

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use files_core::error::{AppError, ErrorKind};
use files_core::result::AppResult;

use crate::providers::LocalStorageProvider;

/// Path of the `width` pixel thumbnail of `source`: `<source>_<width>`.
pub fn thumbnail_path(source: &str, width: u32) -> String {
    format!("{source}_{width}")
}

/// Generates width-bounded thumbnails next to their source image.
#[derive(Debug, Clone)]
pub struct ThumbnailGenerator {
    storage: LocalStorageProvider,
}

impl ThumbnailGenerator {
    /// Create a new thumbnail generator.
    pub fn new(storage: LocalStorageProvider) -> Self {
        Self { storage }
    }

    /// Generate one thumbnail of `source_path` at `width` pixels.
    ///
    /// Returns the path of the written thumbnail.
    pub async fn generate(&self, source_path: &str, width: u32) -> AppResult<String> {
        let source_bytes = self.storage.read_bytes(source_path).await?;

        let thumbnail_bytes =
            tokio::task::spawn_blocking(move || Self::resize_image(&source_bytes, width))
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Internal, "Thumbnail task panicked", e)
                })??;

        let thumb_path = thumbnail_path(source_path, width);
        self.storage.write(&thumb_path, thumbnail_bytes).await?;

        tracing::debug!(
            source = source_path,
            width,
            output = %thumb_path,
            "Generated thumbnail"
        );

        Ok(thumb_path)
    }

    /// Scale an encoded image down to `width` pixels, keeping its aspect
    /// ratio and encoding. Images already narrower are re-encoded unscaled.
    fn resize_image(data: &[u8], width: u32) -> AppResult<Bytes> {
        if width == 0 {
            return Err(AppError::validation("Thumbnail width must be positive"));
        }
        let format = image::guess_format(data).unwrap_or(ImageFormat::Png);
        let source = image::load_from_memory_with_format(data, format).map_err(|e| {
            AppError::with_source(ErrorKind::Validation, "Unsupported image content", e)
        })?;

        let resized = if source.width() > width {
            source.resize(width, u32::MAX, FilterType::Triangle)
        } else {
            source
        };
        let resized = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
            _ => resized,
        };

        let mut out = Vec::new();
        resized
            .write_to(&mut Cursor::new(&mut out), format)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to encode thumbnail", e))?;
        Ok(Bytes::from(out))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use image::{GenericImageView, RgbImage};

    use super::*;

    fn png(width: u32, height: u32) -> Bytes {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 10, 10])));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png).unwrap();
        Bytes::from(out)
    }

    async fn storage() -> (tempfile::TempDir, LocalStorageProvider) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        (dir, storage)
    }

    #[test]
    fn test_thumbnail_path() {
        assert_eq!(thumbnail_path("/tmp/files_manager/abc", 250), "/tmp/files_manager/abc_250");
    }

    #[tokio::test]
    async fn test_generate_keeps_aspect_ratio() {
        let (_dir, storage) = storage().await;
        let source = storage.store(png(1000, 600)).await.unwrap();
        let generator = ThumbnailGenerator::new(storage.clone());

        let out = generator.generate(&source, 250).await.unwrap();
        assert_eq!(out, format!("{source}_250"));

        let thumb = image::load_from_memory(&storage.read_bytes(&out).await.unwrap()).unwrap();
        assert_eq!(thumb.dimensions(), (250, 150));
    }

    #[tokio::test]
    async fn test_small_image_is_not_upscaled() {
        let (_dir, storage) = storage().await;
        let source = storage.store(png(80, 40)).await.unwrap();
        let generator = ThumbnailGenerator::new(storage.clone());

        let out = generator.generate(&source, 500).await.unwrap();
        let thumb = image::load_from_memory(&storage.read_bytes(&out).await.unwrap()).unwrap();
        assert_eq!(thumb.dimensions(), (80, 40));
    }

    #[tokio::test]
    async fn test_non_image_content_fails() {
        let (_dir, storage) = storage().await;
        let source = storage.store(Bytes::from("Hello Webstack!")).await.unwrap();
        let generator = ThumbnailGenerator::new(storage.clone());

        let err = generator.generate(&source, 100).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(!Path::new(&thumbnail_path(&source, 100)).exists());
    }

    #[tokio::test]
    async fn test_missing_source_is_not_found() {
        let (dir, storage) = storage().await;
        let generator = ThumbnailGenerator::new(storage);
        let missing = dir.path().join("gone");
        let err = generator.generate(missing.to_str().unwrap(), 100).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
