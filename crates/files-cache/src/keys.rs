//! Cache key builders.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Cache key holding the user id of a session: `<prefix><token>`,
/// e.g. `auth_0b6f...`.
pub fn session(prefix: &str, token: &str) -> String {
    format!("{prefix}{token}")
}
