//! # files-database
//!
//! The document store: user and file record stores behind the
//! [`UserStore`] and [`FileStore`] traits, with PostgreSQL repositories
//! for production and in-memory stores for tests and single-process runs.
//! Also owns the pool lifecycle, migrations, and the `jobs` table.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::{MemoryFileStore, MemoryUserStore};
pub use repositories::{FileRepository, JobRepository, UserRepository};
pub use store::{FileStore, UserStore};
