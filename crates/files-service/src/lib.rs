//! # files-service
//!
//! Business logic service layer for Files Manager. Each service orchestrates
//! the stores, cache, storage, and job producers to implement one group of
//! application use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod app;
pub mod dispatch;
pub mod file;
pub mod user;

pub use app::{AppService, AppStats, AppStatus};
pub use dispatch::JobDispatcher;
pub use file::{FileContent, FileService, UploadRequest};
pub use user::UserService;
