//! User entity, reduced to what authentication needs.
//!
//! Profile management, preferences, and the rest of the account surface
//! live in the application layer and only consume the authenticated
//! subject identity produced here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated principal record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login email, unique
    pub email: String,

    /// Opaque credential hash; verified through the CredentialVerifier
    /// capability, never interpreted here
    pub password_hash: String,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("ada@example.com".to_string(), "$2b$12$hash".to_string());

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.password_hash, "$2b$12$hash");
    }
}
