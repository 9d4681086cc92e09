//! # talenthub-entity
//!
//! Domain entity models for the TalentHub identity core: user accounts
//! and refresh sessions.

pub mod session;
pub mod user;

pub use session::{CreateSession, Session};
pub use user::{CreateUser, User};
