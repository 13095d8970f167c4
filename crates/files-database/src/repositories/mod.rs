//! PostgreSQL repositories.

pub mod file;
pub mod job;
pub mod user;

pub use file::FileRepository;
pub use job::JobRepository;
pub use user::UserRepository;
