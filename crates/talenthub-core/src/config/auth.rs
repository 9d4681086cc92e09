//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token issuance and credential configuration.
///
/// The secret must be overridden in any environment that issues or
/// validates tokens; an empty secret makes every token operation fail
/// fast with a configuration error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for access-token signing (HMAC-SHA256).
    #[serde(default = "default_secret")]
    pub secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_hours: default_refresh_ttl(),
        }
    }
}

fn default_secret() -> String {
    "dev-secret-change-me".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    720 // 30 days
}
