//! Domain error taxonomy for identity operations.
//!
//! Authentication failures are deliberately uninformative to callers so
//! the boundary cannot be used for account enumeration; infrastructure
//! failures travel unmodified inside [`AuthError::Store`].

use thiserror::Error;

use talenthub_core::error::AppError;

/// Errors surfaced by the identity service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email requirements were not met.
    #[error("email is required")]
    InvalidEmail,
    /// Password is below minimal requirements.
    #[error("password must be at least 8 characters")]
    WeakPassword,
    /// A user already exists for that email.
    #[error("email already registered")]
    EmailInUse,
    /// Authentication failed; covers unknown email and wrong password alike.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// The refresh token could not be validated.
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    /// The refresh token is no longer valid.
    #[error("refresh token expired")]
    ExpiredRefreshToken,
    /// The bearer token could not be validated.
    #[error("invalid access token")]
    InvalidAccessToken,
    /// The bearer token has expired.
    #[error("access token expired")]
    AccessTokenExpired,
    /// The account is not active.
    #[error("user is inactive")]
    InactiveAccount,
    /// The signing secret is not configured; a deployment defect, not a
    /// bad credential.
    #[error("auth secret is not configured")]
    MissingSecret,
    /// The user lacks the required privileges.
    #[error("insufficient privileges")]
    Forbidden,
    /// An infrastructure failure from the store or transaction wrapper.
    #[error(transparent)]
    Store(#[from] AppError),
}
