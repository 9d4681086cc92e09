//! Shared test helpers: an in-memory identity store with real
//! transaction semantics (staged writes, applied on commit) and a
//! manually advanced clock.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use talenthub_auth::IdentityService;
use talenthub_core::clock::Clock;
use talenthub_core::config::auth::AuthConfig;
use talenthub_core::error::AppError;
use talenthub_core::result::AppResult;
use talenthub_database::store::{IdentityStore, StoreTx};
use talenthub_entity::session::{CreateSession, Session};
use talenthub_entity::user::{CreateUser, User};

pub const TEST_SECRET: &str = "integration-test-secret";

#[derive(Debug, Default, Clone)]
struct State {
    users: Vec<User>,
    sessions: Vec<Session>,
}

/// In-memory stand-in for the Postgres store. `begin` snapshots the
/// state; writes go to the snapshot and only land on `commit`, so
/// rollback-on-error behavior is observable in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    pub fn session_count(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }

    pub fn stored_user(&self, email: &str) -> Option<User> {
        let state = self.state.lock().unwrap();
        state.users.iter().find(|u| u.email == email).cloned()
    }

    pub fn set_user_status(&self, id: Uuid, status: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
            user.status = status.to_string();
        }
    }

    pub fn remove_user(&self, id: Uuid) {
        let mut state = self.state.lock().unwrap();
        state.users.retain(|u| u.id != id);
    }
}

pub struct MemoryTx {
    staged: State,
}

#[async_trait]
impl IdentityStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> AppResult<MemoryTx> {
        Ok(MemoryTx {
            staged: self.state.lock().unwrap().clone(),
        })
    }

    async fn commit(&self, tx: MemoryTx) -> AppResult<()> {
        *self.state.lock().unwrap() = tx.staged;
        Ok(())
    }

    async fn rollback(&self, _tx: MemoryTx) -> AppResult<()> {
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        Ok(self.staged.users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&mut self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.staged.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&mut self, data: &CreateUser) -> AppResult<User> {
        if self.staged.users.iter().any(|u| u.email == data.email) {
            return Err(AppError::conflict("Email already in use"));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            role: "candidate".to_string(),
            status: "active".to_string(),
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.staged.users.push(user.clone());
        Ok(user)
    }

    async fn touch_last_login(&mut self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(user) = self.staged.users.iter_mut().find(|u| u.id == user_id) {
            user.last_login_at = Some(at);
            user.updated_at = at;
        }
        Ok(())
    }

    async fn create_session(&mut self, data: &CreateSession) -> AppResult<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            refresh_token_hash: data.refresh_token_hash.clone(),
            user_agent: data.user_agent.clone(),
            ip: data.ip,
            expires_at: data.expires_at,
            created_at: Utc::now(),
        };
        self.staged.sessions.push(session.clone());
        Ok(session)
    }

    async fn session_by_token_hash(&mut self, hash: &str) -> AppResult<Option<Session>> {
        Ok(self
            .staged
            .sessions
            .iter()
            .find(|s| s.refresh_token_hash == hash)
            .cloned())
    }

    async fn delete_session(&mut self, id: Uuid) -> AppResult<bool> {
        let before = self.staged.sessions.len();
        self.staged.sessions.retain(|s| s.id != id);
        Ok(self.staged.sessions.len() < before)
    }

    async fn delete_sessions_for_user(&mut self, user_id: Uuid) -> AppResult<u64> {
        let before = self.staged.sessions.len();
        self.staged.sessions.retain(|s| s.user_id != user_id);
        Ok((before - self.staged.sessions.len()) as u64)
    }
}

/// A clock the test advances by hand.
#[derive(Clone)]
pub struct TestClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl TestClock {
    pub fn start() -> Self {
        Self {
            now: Arc::new(Mutex::new(
                Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            )),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }

    pub fn clock(&self) -> Clock {
        let now = self.now.clone();
        Clock::from_fn(move || *now.lock().unwrap())
    }
}

pub fn test_config(secret: &str) -> AuthConfig {
    AuthConfig {
        secret: secret.to_string(),
        access_ttl_minutes: 15,
        refresh_ttl_hours: 720,
    }
}

/// A service over a fresh in-memory store and a hand-advanced clock.
pub fn test_service() -> (IdentityService<MemoryStore>, MemoryStore, TestClock) {
    let store = MemoryStore::new();
    let clock = TestClock::start();
    let service =
        IdentityService::new(store.clone(), test_config(TEST_SECRET)).with_clock(clock.clock());
    (service, store, clock)
}
