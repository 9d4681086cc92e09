//! The transactional identity store.
//!
//! All multi-step identity operations (check-then-insert on registration,
//! delete-then-insert on refresh rotation) run against a [`StoreTx`]
//! handle obtained from [`IdentityStore::begin`], inside exactly one
//! transaction. The Postgres implementation opens its transactions at
//! REPEATABLE READ so the database serializes conflicting concurrent
//! registrations on the same email and concurrent redemptions of the same
//! refresh digest.

pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use talenthub_core::result::AppResult;
use talenthub_entity::session::{CreateSession, Session};
use talenthub_entity::user::{CreateUser, User};

pub use postgres::{PgStore, PgStoreTx};

/// A scoped query handle, valid for the duration of one transaction.
#[async_trait]
pub trait StoreTx: Send {
    /// Look up a user by (already normalized) email.
    async fn user_by_email(&mut self, email: &str) -> AppResult<Option<User>>;

    /// Look up a user by primary key.
    async fn user_by_id(&mut self, id: Uuid) -> AppResult<Option<User>>;

    /// Insert a new user; role and status come from column defaults.
    async fn create_user(&mut self, data: &CreateUser) -> AppResult<User>;

    /// Record a successful login.
    async fn touch_last_login(&mut self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Insert a new refresh session.
    async fn create_session(&mut self, data: &CreateSession) -> AppResult<Session>;

    /// Look up a session by the digest of its refresh-token secret.
    async fn session_by_token_hash(&mut self, hash: &str) -> AppResult<Option<Session>>;

    /// Delete one session; returns whether a row was removed.
    async fn delete_session(&mut self, id: Uuid) -> AppResult<bool>;

    /// Delete every session owned by a user; returns the count removed.
    async fn delete_sessions_for_user(&mut self, user_id: Uuid) -> AppResult<u64>;
}

/// The transactional boundary around user and session records.
///
/// `commit` and `rollback` consume the handle; a rollback failure is
/// returned in place of the error that triggered it, never swallowed.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// The transaction handle type.
    type Tx: StoreTx;

    /// Open a transaction at repeatable-read isolation.
    async fn begin(&self) -> AppResult<Self::Tx>;

    /// Commit the unit of work.
    async fn commit(&self, tx: Self::Tx) -> AppResult<()>;

    /// Abandon the unit of work.
    async fn rollback(&self, tx: Self::Tx) -> AppResult<()>;

    /// Single-statement user read outside any transaction, used by
    /// access-token validation to re-resolve the subject.
    async fn user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
}
