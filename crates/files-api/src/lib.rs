//! # files-api
//!
//! HTTP API layer for Files Manager built on Axum.
//!
//! Provides the REST endpoints, middleware (CORS, request logging),
//! extractors, DTOs, error mapping, and the wiring of backends into
//! handler state.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Backends, build_app, build_executor, build_state};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
