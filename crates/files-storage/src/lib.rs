//! # files-storage
//!
//! Content storage for Files Manager: uploaded bodies live as flat files
//! under a single folder, thumbnails sit beside their source as
//! `<path>_<width>`.

pub mod providers;
pub mod thumbnail;

pub use providers::{ByteStream, LocalStorageProvider};
pub use thumbnail::{ThumbnailGenerator, thumbnail_path};
