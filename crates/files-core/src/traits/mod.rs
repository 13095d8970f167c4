//! Seam traits defined in `files-core` and implemented by other crates.

pub mod cache;
pub mod queue;

pub use cache::CacheProvider;
pub use queue::{Delivery, JobState, QueueBackend};
