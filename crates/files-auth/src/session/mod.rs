//! Session token lifecycle.

pub mod manager;

pub use manager::SessionManager;
