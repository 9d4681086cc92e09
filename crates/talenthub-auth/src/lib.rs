//! # talenthub-auth
//!
//! The identity and session-lifecycle core for TalentHub.
//!
//! ## Modules
//!
//! - `password`: Argon2id credential hashing and verification
//! - `token`: access-token mint/parse and refresh-secret generation
//! - `service`: registration, login, refresh rotation, logout, and
//!   access-token validation over the transactional store
//! - `error`: the domain error taxonomy

pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use password::CredentialHasher;
pub use service::{AuthOutcome, IdentityService, SessionMetadata, require_staff};
