//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use talenthub_core::error::AppError;
use talenthub_core::result::AppResult;

/// Memory cost in KiB (64 MiB).
const ARGON_MEMORY_KIB: u32 = 64 * 1024;
/// Number of passes.
const ARGON_TIME_COST: u32 = 1;
/// Degree of parallelism.
const ARGON_PARALLELISM: u32 = 1;
/// Derived key length in bytes.
const ARGON_OUTPUT_LEN: usize = 32;

/// Handles password hashing and verification using Argon2id.
///
/// Hashes are serialized as PHC strings
/// (`$argon2id$v=19$m=65536,t=1,p=1$<salt>$<hash>`); verification
/// re-derives with the parameters and salt embedded in the stored string
/// and compares in constant time.
#[derive(Debug, Clone)]
pub struct CredentialHasher;

impl CredentialHasher {
    /// Creates a new hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password with a fresh random 16-byte salt.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not,
    /// and an error if the stored string is malformed. Callers collapse
    /// all three non-match outcomes into one coarse credentials failure.
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match argon2()?.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn argon2() -> AppResult<Argon2<'static>> {
    let params = Params::new(
        ARGON_MEMORY_KIB,
        ARGON_TIME_COST,
        ARGON_PARALLELISM,
        Some(ARGON_OUTPUT_LEN),
    )
    .map_err(|e| AppError::internal(format!("Invalid Argon2 parameters: {e}")))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}
