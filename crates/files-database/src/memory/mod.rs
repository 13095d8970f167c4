//! In-memory stores with the same semantics as the PostgreSQL repositories.
//!
//! Used by tests and by single-process deployments (`database.provider =
//! "memory"`). Data does not survive a restart.

pub mod file;
pub mod user;

pub use file::MemoryFileStore;
pub use user::MemoryUserStore;
