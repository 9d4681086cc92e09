//! Convenience result type alias for TalentHub.

use crate::error::AppError;

/// A specialized `Result` type for TalentHub infrastructure operations.
pub type AppResult<T> = Result<T, AppError>;
