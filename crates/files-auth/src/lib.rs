//! # files-auth
//!
//! Authentication for Files Manager.
//!
//! ## Modules
//!
//! - `password`: Argon2id password digests
//! - `credentials`: `Authorization: Basic` header decoding
//! - `session`: opaque session tokens stored in the cache as `auth_<token>`

pub mod credentials;
pub mod password;
pub mod session;

pub use credentials::BasicCredentials;
pub use password::PasswordHasher;
pub use session::SessionManager;
