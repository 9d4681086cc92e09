//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Elevated roles recognized by the authorization layer. Comparisons are
/// case-insensitive; the column itself is free-form.
const STAFF_ROLES: [&str; 2] = ["staff", "admin"];

/// A registered user account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Lowercase-normalized email address (unique).
    pub email: String,
    /// Argon2id password hash (PHC string). Scrubbed to empty before the
    /// record is returned to any caller.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Free-form role; "staff" and "admin" unlock elevated access.
    pub role: String,
    /// Account status; only "active" passes authorization.
    pub status: String,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the account may authenticate at all.
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }

    /// Whether the account holds an elevated role.
    pub fn is_staff(&self) -> bool {
        STAFF_ROLES
            .iter()
            .any(|role| self.role.eq_ignore_ascii_case(role))
    }

    /// A copy of this user safe to hand to callers: the password hash is
    /// cleared.
    pub fn scrubbed(&self) -> Self {
        Self {
            password_hash: String::new(),
            ..self.clone()
        }
    }
}

/// Data required to create a new user. Role and status come from the
/// store's column defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Lowercase-normalized email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
}
