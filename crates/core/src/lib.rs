//! Shared primitives for all Rust crates in taskgate.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across taskgate crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Locally supplied settings are out of range, such as paging bounds.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
