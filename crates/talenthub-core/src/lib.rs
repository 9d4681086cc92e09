//! # talenthub-core
//!
//! Core crate for the TalentHub identity service. Contains configuration
//! schemas, the injectable clock, and the unified error system.
//!
//! This crate has **no** internal dependencies on other TalentHub crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod result;

pub use clock::Clock;
pub use error::AppError;
pub use result::AppResult;
