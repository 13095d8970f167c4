//! File and folder services.

pub mod service;

pub use service::{FileContent, FileService, UploadRequest};
