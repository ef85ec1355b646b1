//! Error types shared across the crate.

use thiserror::Error;

pub type PressboxResult<T> = std::result::Result<T, PressboxError>;

/// Errors surfaced by pressbox operations.
///
/// Configuration errors are raised before any side effect occurs; all
/// other variants propagate collaborator failures unmodified, with no
/// retry and no partial-state cleanup.
#[derive(Error, Debug)]
pub enum PressboxError {
    /// Invalid configuration supplied by the caller.
    #[error("config error: {0}")]
    Config(String),

    /// Host filesystem operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Asset download or archive extraction failed.
    #[error("download error: {0}")]
    Download(String),

    /// The PHP execution environment reported a failure.
    #[error("php runtime error: {0}")]
    Runtime(String),

    /// Invariant violation inside pressbox itself.
    #[error("internal error: {0}")]
    Internal(String),
}
