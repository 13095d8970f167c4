//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use files_auth::SessionManager;
use files_core::config::AppConfig;
use files_service::{AppService, FileService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Session lifecycle manager
    pub sessions: Arc<SessionManager>,
    /// Registration and profile service
    pub users: Arc<UserService>,
    /// File service
    pub files: Arc<FileService>,
    /// Status and stats service
    pub app: Arc<AppService>,
}
