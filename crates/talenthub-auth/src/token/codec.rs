//! Signed access tokens and opaque refresh secrets.
//!
//! Access tokens are HS256 JWTs; any token whose header names a different
//! algorithm family is rejected outright. Expiry is NOT validated here:
//! the decoder's automatic `exp` check runs against the wall clock, which
//! would bypass the injected clock, so the service judges expiry itself.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use talenthub_core::error::AppError;

use crate::error::AuthError;
use crate::token::claims::AccessClaims;

/// Number of random bytes behind each refresh-token secret.
const REFRESH_SECRET_LEN: usize = 32;

/// A freshly drawn refresh-token secret.
#[derive(Debug, Clone)]
pub struct RefreshSecret {
    /// The opaque string handed to the caller; never persisted.
    pub plaintext: String,
    /// SHA-256 hex digest of the plaintext, the store lookup key.
    pub token_hash: String,
    /// When the secret stops being redeemable.
    pub expires_at: DateTime<Utc>,
}

/// Mint a signed access token for the given user and role.
pub fn mint_access_token(
    secret: &str,
    user_id: Uuid,
    role: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let claims = AccessClaims {
        sub: user_id.to_string(),
        role: role.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Store(AppError::internal(format!("Failed to sign token: {e}"))))
}

/// Parse and signature-check an access token, returning its claims.
///
/// Structural and signature failures collapse into `InvalidAccessToken`;
/// an empty secret is a distinct configuration error.
pub fn parse_access_token(secret: &str, token: &str) -> Result<AccessClaims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidAccessToken)
}

/// Draw a fresh refresh-token secret: 32 bytes from the OS entropy
/// source, URL-safe-base64 plaintext, SHA-256 hex digest for the store.
pub fn generate_refresh_token(ttl: Duration, now: DateTime<Utc>) -> Result<RefreshSecret, AuthError> {
    let mut buf = [0u8; REFRESH_SECRET_LEN];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| AuthError::Store(AppError::internal(format!("Entropy source failed: {e}"))))?;

    let plaintext = URL_SAFE_NO_PAD.encode(buf);
    let token_hash = hash_refresh_token(&plaintext);

    Ok(RefreshSecret {
        plaintext,
        token_hash,
        expires_at: now + ttl,
    })
}

/// SHA-256 hex digest of a refresh-token plaintext. Sessions are always
/// looked up by digest, never by plaintext.
pub fn hash_refresh_token(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SECRET: &str = "test-secret";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn mint_then_parse_roundtrip() {
        let user_id = Uuid::new_v4();
        let token =
            mint_access_token(SECRET, user_id, "candidate", Duration::minutes(15), now()).unwrap();
        let claims = parse_access_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "candidate");
        assert_eq!(claims.iat, now().timestamp());
        assert_eq!(claims.exp, (now() + Duration::minutes(15)).timestamp());
    }

    #[test]
    fn empty_secret_fails_fast_both_ways() {
        let minted = mint_access_token("", Uuid::new_v4(), "candidate", Duration::minutes(15), now());
        assert!(matches!(minted, Err(AuthError::MissingSecret)));
        assert!(matches!(
            parse_access_token("", "whatever"),
            Err(AuthError::MissingSecret)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token =
            mint_access_token(SECRET, Uuid::new_v4(), "candidate", Duration::minutes(15), now())
                .unwrap();
        assert!(matches!(
            parse_access_token("another-secret", &token),
            Err(AuthError::InvalidAccessToken)
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token =
            mint_access_token(SECRET, Uuid::new_v4(), "candidate", Duration::minutes(15), now())
                .unwrap();
        let mut tampered = token.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert!(matches!(
            parse_access_token(SECRET, &tampered),
            Err(AuthError::InvalidAccessToken)
        ));
    }

    #[test]
    fn non_hs256_algorithm_is_rejected() {
        // Same secret, different HMAC width; the decoder pins HS256.
        let claims = AccessClaims {
            sub: Uuid::new_v4().to_string(),
            role: "candidate".to_string(),
            iat: now().timestamp(),
            exp: (now() + Duration::minutes(15)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            parse_access_token(SECRET, &token),
            Err(AuthError::InvalidAccessToken)
        ));
    }

    #[test]
    fn expired_token_still_parses() {
        // Expiry is the service's job, judged against the injected clock.
        let token =
            mint_access_token(SECRET, Uuid::new_v4(), "candidate", Duration::minutes(-5), now())
                .unwrap();
        let claims = parse_access_token(SECRET, &token).unwrap();
        assert!(claims.exp < now().timestamp());
    }

    #[test]
    fn refresh_secrets_are_unique_and_digestible() {
        let first = generate_refresh_token(Duration::hours(720), now()).unwrap();
        let second = generate_refresh_token(Duration::hours(720), now()).unwrap();

        assert_ne!(first.plaintext, second.plaintext);
        assert_eq!(first.token_hash, hash_refresh_token(&first.plaintext));
        assert_eq!(first.expires_at, now() + Duration::hours(720));
        // 32 bytes, URL-safe base64 without padding.
        assert_eq!(first.plaintext.len(), 43);
    }

    #[test]
    fn refresh_digest_is_plain_sha256_hex() {
        assert_eq!(
            hash_refresh_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
