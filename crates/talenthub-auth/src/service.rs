//! Registration, login, refresh rotation, logout, and access-token
//! validation, orchestrated over the transactional store.
//!
//! Every multi-step operation runs inside exactly one repeatable-read
//! transaction; any failure rolls the whole unit of work back, so a user
//! is never committed without its session or vice versa.

use std::net::IpAddr;

use chrono::Duration;
use ipnetwork::IpNetwork;
use tracing::warn;
use uuid::Uuid;

use talenthub_core::clock::Clock;
use talenthub_core::config::auth::AuthConfig;
use talenthub_database::store::{IdentityStore, StoreTx};
use talenthub_entity::session::CreateSession;
use talenthub_entity::user::{CreateUser, User};

use crate::error::AuthError;
use crate::password::CredentialHasher;
use crate::token;

/// Minimum accepted password length, in characters.
const MIN_PASSWORD_CHARS: usize = 8;
/// Access-token TTL applied when the configured value is zero.
const DEFAULT_ACCESS_TTL_MINUTES: u64 = 15;
/// Refresh-token TTL applied when the configured value is zero (30 days).
const DEFAULT_REFRESH_TTL_HOURS: u64 = 720;

/// Contextual client information recorded on refresh sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionMetadata {
    /// User-Agent header value, if the caller supplied one.
    pub user_agent: Option<String>,
    /// Client address as reported by the boundary; stored only if it
    /// parses as an IP.
    pub ip: Option<String>,
}

/// Issued tokens along with the authenticated user.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// The user, with its password hash scrubbed.
    pub user: User,
    /// Signed short-lived access token.
    pub access_token: String,
    /// Opaque single-use refresh token.
    pub refresh_token: String,
    /// When the refresh token stops being redeemable.
    pub refresh_expires_at: chrono::DateTime<chrono::Utc>,
}

/// Coordinates registration, login, and session-lifecycle workflows.
#[derive(Debug, Clone)]
pub struct IdentityService<S> {
    store: S,
    hasher: CredentialHasher,
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Clock,
}

impl<S: IdentityStore> IdentityService<S> {
    /// Constructs the service; zero TTLs fall back to the defaults
    /// (15 minutes access, 720 hours refresh).
    pub fn new(store: S, config: AuthConfig) -> Self {
        let access_minutes = if config.access_ttl_minutes == 0 {
            DEFAULT_ACCESS_TTL_MINUTES
        } else {
            config.access_ttl_minutes
        };
        let refresh_hours = if config.refresh_ttl_hours == 0 {
            DEFAULT_REFRESH_TTL_HOURS
        } else {
            config.refresh_ttl_hours
        };

        Self {
            store,
            hasher: CredentialHasher::new(),
            secret: config.secret,
            access_ttl: Duration::minutes(access_minutes as i64),
            refresh_ttl: Duration::hours(refresh_hours as i64),
            clock: Clock::system(),
        }
    }

    /// Overrides the clock; the testability seam for expiry boundaries.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Creates a new user and issues its first token pair.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        meta: SessionMetadata,
    ) -> Result<AuthOutcome, AuthError> {
        let email = email.trim().to_lowercase();
        let password = password.trim();
        if email.is_empty() {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::WeakPassword);
        }

        let mut tx = self.store.begin().await?;
        let outcome = self.register_in_tx(&mut tx, &email, password, &meta).await;
        self.finish(tx, outcome).await
    }

    async fn register_in_tx(
        &self,
        tx: &mut S::Tx,
        email: &str,
        password: &str,
        meta: &SessionMetadata,
    ) -> Result<AuthOutcome, AuthError> {
        if tx.user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailInUse);
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = tx
            .create_user(&CreateUser {
                email: email.to_string(),
                password_hash,
            })
            .await?;

        self.issue_tokens(tx, &user, meta).await
    }

    /// Authenticates a user and issues fresh tokens.
    ///
    /// Only the email is normalized; the password is verified exactly as
    /// sent.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        meta: SessionMetadata,
    ) -> Result<AuthOutcome, AuthError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let mut tx = self.store.begin().await?;
        let outcome = self.login_in_tx(&mut tx, &email, password, &meta).await;
        self.finish(tx, outcome).await
    }

    async fn login_in_tx(
        &self,
        tx: &mut S::Tx,
        email: &str,
        password: &str,
        meta: &SessionMetadata,
    ) -> Result<AuthOutcome, AuthError> {
        let user = tx
            .user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Unknown email, wrong password, and an undecipherable stored
        // hash are indistinguishable to the caller.
        match self.hasher.verify_password(password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) | Err(_) => return Err(AuthError::InvalidCredentials),
        }

        let outcome = self.issue_tokens(tx, &user, meta).await?;

        if let Err(err) = tx.touch_last_login(user.id, self.clock.now()).await {
            warn!(user_id = %user.id, error = %err, "failed to update last login");
        }

        Ok(outcome)
    }

    /// Redeems a refresh token for a new token pair, rotating the session.
    ///
    /// Refresh tokens are single-use: the old session is deleted before
    /// the new one is created, so a second redemption of the same secret
    /// finds no digest and fails.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        meta: SessionMetadata,
    ) -> Result<AuthOutcome, AuthError> {
        let plaintext = refresh_token.trim();
        if plaintext.is_empty() {
            return Err(AuthError::InvalidRefreshToken);
        }
        let hashed = token::hash_refresh_token(plaintext);

        let mut tx = self.store.begin().await?;
        let outcome = self.refresh_in_tx(&mut tx, &hashed, &meta).await;
        self.finish(tx, outcome).await
    }

    async fn refresh_in_tx(
        &self,
        tx: &mut S::Tx,
        hashed: &str,
        meta: &SessionMetadata,
    ) -> Result<AuthOutcome, AuthError> {
        let session = tx
            .session_by_token_hash(hashed)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let now = self.clock.now();
        if session.is_expired(now) {
            if let Err(err) = tx.delete_session(session.id).await {
                warn!(session_id = %session.id, error = %err, "failed to delete expired session");
            }
            return Err(AuthError::ExpiredRefreshToken);
        }

        let user = match tx.user_by_id(session.user_id).await? {
            Some(user) => user,
            None => {
                if let Err(err) = tx.delete_session(session.id).await {
                    warn!(session_id = %session.id, error = %err, "failed to delete orphaned session");
                }
                return Err(AuthError::InvalidRefreshToken);
            }
        };

        tx.delete_session(session.id).await?;

        self.issue_tokens(tx, &user, meta).await
    }

    /// Revokes the session tied to the provided refresh token.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let plaintext = refresh_token.trim();
        if plaintext.is_empty() {
            return Err(AuthError::InvalidRefreshToken);
        }
        let hashed = token::hash_refresh_token(plaintext);

        let mut tx = self.store.begin().await?;
        let outcome = async {
            let session = tx
                .session_by_token_hash(&hashed)
                .await?
                .ok_or(AuthError::InvalidRefreshToken)?;
            tx.delete_session(session.id).await?;
            Ok(())
        }
        .await;
        self.finish(tx, outcome).await
    }

    /// Removes every refresh session owned by the user (forced
    /// sign-out-everywhere).
    pub async fn revoke_all_sessions(&self, user_id: Uuid) -> Result<(), AuthError> {
        let mut tx = self.store.begin().await?;
        let outcome = tx
            .delete_sessions_for_user(user_id)
            .await
            .map(|_| ())
            .map_err(AuthError::from);
        self.finish(tx, outcome).await
    }

    /// Parses and validates a bearer token, returning the associated user
    /// with its password hash scrubbed.
    pub async fn validate_access_token(&self, bearer: &str) -> Result<User, AuthError> {
        let bearer = bearer.trim();
        if bearer.is_empty() {
            return Err(AuthError::InvalidAccessToken);
        }

        let claims = match token::parse_access_token(&self.secret, bearer) {
            Ok(claims) => claims,
            Err(AuthError::MissingSecret) => return Err(AuthError::MissingSecret),
            Err(_) => return Err(AuthError::InvalidAccessToken),
        };

        if claims.exp < self.clock.now().timestamp() {
            return Err(AuthError::AccessTokenExpired);
        }

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidAccessToken)?;

        let user = self
            .store
            .user_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidAccessToken)?;

        if !user.is_active() {
            return Err(AuthError::InactiveAccount);
        }

        Ok(user.scrubbed())
    }

    /// Mints a token pair and persists the backing session; shared by
    /// register, login, and refresh.
    async fn issue_tokens(
        &self,
        tx: &mut S::Tx,
        user: &User,
        meta: &SessionMetadata,
    ) -> Result<AuthOutcome, AuthError> {
        let now = self.clock.now();

        let access_token =
            token::mint_access_token(&self.secret, user.id, &user.role, self.access_ttl, now)?;
        let refresh = token::generate_refresh_token(self.refresh_ttl, now)?;

        let user_agent = meta
            .user_agent
            .as_deref()
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .map(str::to_owned);

        tx.create_session(&CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh.token_hash,
            user_agent,
            ip: meta.ip.as_deref().and_then(parse_client_ip),
            expires_at: refresh.expires_at,
        })
        .await?;

        Ok(AuthOutcome {
            user: user.scrubbed(),
            access_token,
            refresh_token: refresh.plaintext,
            refresh_expires_at: refresh.expires_at,
        })
    }

    /// Commits on success; rolls back on failure. A rollback failure is
    /// returned in place of the original error.
    async fn finish<T>(&self, tx: S::Tx, outcome: Result<T, AuthError>) -> Result<T, AuthError> {
        match outcome {
            Ok(value) => {
                self.store.commit(tx).await?;
                Ok(value)
            }
            Err(err) => {
                self.store.rollback(tx).await?;
                Err(err)
            }
        }
    }
}

/// Requires an elevated role ("staff" or "admin", case-insensitive);
/// consumed by the boundary's staff-only endpoints.
pub fn require_staff(user: &User) -> Result<(), AuthError> {
    if user.is_staff() {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Parses a client address into a host-masked inet value: /32 for IPv4,
/// /128 for IPv6. Unparsable input is dropped.
fn parse_client_ip(raw: &str) -> Option<IpNetwork> {
    let addr: IpAddr = raw.trim().parse().ok()?;
    let prefix = match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    };
    IpNetwork::new(addr, prefix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_role(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            password_hash: String::new(),
            role: role.to_string(),
            status: "active".to_string(),
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn staff_and_admin_pass_the_staff_gate() {
        assert!(require_staff(&user_with_role("staff")).is_ok());
        assert!(require_staff(&user_with_role("ADMIN")).is_ok());
        assert!(matches!(
            require_staff(&user_with_role("candidate")),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn client_ips_are_host_masked() {
        assert_eq!(
            parse_client_ip("203.0.113.7").unwrap().to_string(),
            "203.0.113.7/32"
        );
        assert_eq!(
            parse_client_ip(" 2001:db8::1 ").unwrap().to_string(),
            "2001:db8::1/128"
        );
        assert!(parse_client_ip("not-an-ip").is_none());
        assert!(parse_client_ip("").is_none());
    }
}
