//! Application result alias.

use crate::error::AppError;

/// Result alias used by every Drivebox crate.
pub type AppResult<T> = Result<T, AppError>;
