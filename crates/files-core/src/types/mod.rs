//! Core type definitions used across the Files Manager workspace.

pub mod id;
pub mod pagination;

pub use id::*;
pub use pagination::PageRequest;
