//! User entity model.

use chrono::{DateTime, Utc};
use files_core::types::UserId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login email.
    pub email: String,
    /// One-way password digest. Never serialized.
    #[serde(skip_serializing)]
    pub password_digest: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The public projection of this user.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login email.
    pub email: String,
    /// Pre-computed password digest.
    pub password_digest: String,
}

/// `{id, email}` as returned by registration and `/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Login email.
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_never_serialized() {
        let user = User {
            id: UserId::new(),
            email: "bob@dylan.com".to_string(),
            password_digest: "$argon2id$v=19$secret".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).expect("serialize");
        assert!(json.get("password_digest").is_none());
        assert_eq!(json["email"], "bob@dylan.com");
    }

    #[test]
    fn test_profile_projection() {
        let user = User {
            id: UserId::new(),
            email: "ann@example.com".to_string(),
            password_digest: String::new(),
            created_at: Utc::now(),
        };
        let profile = user.profile();
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.email, user.email);
    }
}
