//! User entity representing a registered principal in the Flock system.
//!
//! The authentication core only reads users; creation and profile changes
//! belong to the identity subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authorization role with a numeric precedence
///
/// Higher `level` outranks lower. The core never interprets levels beyond
/// exposing them to downstream authorization middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role name (e.g. "user", "moderator", "admin")
    pub name: String,

    /// Numeric precedence of the role
    pub level: i32,
}

impl Role {
    /// Checks whether this role has at least the precedence of `other`
    pub fn outranks(&self, other: &Role) -> bool {
        self.level >= other.level
    }
}

/// User entity representing a registered principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Unique handle chosen by the user
    pub username: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address used for sign-in
    pub email: String,

    /// Bcrypt hash of the user's password. Never serialized; a user read
    /// back from the cache carries an empty hash and must not be used for
    /// credential verification.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Whether the account has been activated and not suspended
    pub is_active: bool,

    /// Authorization role
    pub role: Role,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Full display name
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
