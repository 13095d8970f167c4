//! Queue backends.

pub mod memory;
pub mod postgres;

pub use memory::MemoryQueueBackend;
pub use postgres::PgQueueBackend;
