use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Role every registered account receives.
pub const DEFAULT_ROLE: &str = "ROLE_USER";

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// A user account as stored and returned by the API.
///
/// The password digest is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Comma-separated role tags, e.g. `ROLE_USER,ROLE_ADMIN`.
    pub roles: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether `role` appears among the user's comma-separated role tags.
    pub fn has_role(&self, role: &str) -> bool {
        has_role(&self.roles, role)
    }
}

pub(crate) fn has_role(roles: &str, role: &str) -> bool {
    roles.split(',').map(str::trim).any(|r| r == role)
}

/// A user record ready for insertion; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: String,
}

/// Payload for a new user registration request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Between 3 and 32 characters: letters, digits, underscores or hyphens.
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    /// At most 255 characters, the width of the `users.email` column.
    #[validate(email(message = "Email should be valid"), length(max = 255))]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Payload for `update_user`: the account is located by `username` and the
/// remaining fields overwrite the stored record.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UserUpdate {
    pub username: String,
    /// At most 255 characters, the width of the `users.email` column.
    #[validate(email(message = "Email should be valid"), length(max = 255))]
    pub email: String,
    /// New plaintext password; re-hashed before storage. `None` keeps the current digest.
    #[validate(length(min = 6))]
    pub password: Option<String>,
    /// Replacement role tags. `None` keeps the current roles.
    #[validate(length(max = 255))]
    pub roles: Option<String>,
}
