//! Access-token claim set.

use serde::{Deserialize, Serialize};

/// Claims embedded in every access token.
///
/// The subject is carried as a string and parsed into a user id by the
/// service, so a malformed subject is an invalid token rather than a
/// deserialization panic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user id.
    pub sub: String,
    /// User role at the time of issuance.
    pub role: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}
