//! # talenthub-database
//!
//! PostgreSQL pool setup, embedded schema migrations, and the
//! transactional identity store consumed by `talenthub-auth`.

pub mod connection;
pub mod store;

pub use connection::{connect, ping};
pub use store::{IdentityStore, PgStore, StoreTx};
