//! File entity.

pub mod model;
pub mod parent;

pub use model::{File, FileType, NewFile};
