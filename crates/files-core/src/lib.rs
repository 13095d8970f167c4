//! # files-core
//!
//! Core crate for Files Manager. Contains the seam traits (cache and job
//! queue), configuration schemas, typed identifiers, pagination, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Files Manager crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
