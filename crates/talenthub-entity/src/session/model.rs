//! Refresh-session entity model.

use chrono::{DateTime, Utc};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One issued refresh token.
///
/// A session is created whenever tokens are issued and deleted exactly
/// once: on refresh (rotation), on logout, when found expired on use, or
/// when its owner revokes all sessions. The plaintext secret is never
/// persisted; only its SHA-256 digest.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the refresh-token secret.
    pub refresh_token_hash: String,
    /// User-Agent header captured at issuance.
    pub user_agent: Option<String>,
    /// Client address captured at issuance (host-masked inet).
    pub ip: Option<IpNetwork>,
    /// When the refresh token stops being redeemable.
    pub expires_at: DateTime<Utc>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has expired relative to the given instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// The owning user.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the refresh-token secret.
    pub refresh_token_hash: String,
    /// User-Agent header, if any.
    pub user_agent: Option<String>,
    /// Parsed client address, if any.
    pub ip: Option<IpNetwork>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}
