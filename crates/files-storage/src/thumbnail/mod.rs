//! Image thumbnails.

pub mod generator;

pub use generator::{ThumbnailGenerator, thumbnail_path};
