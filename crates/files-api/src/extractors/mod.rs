//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod path;

pub use auth::{AuthUser, MaybeAuthUser, SessionToken};
pub use json::JsonBody;
pub use path::parse_file_id;
