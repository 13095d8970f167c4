//! Job handlers, one per queue.

pub mod thumbnail;
pub mod welcome;

pub use thumbnail::FileThumbnailJob;
pub use welcome::WelcomeEmailJob;
