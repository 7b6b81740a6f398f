//! Error types for the UrlGuard core.

/// Core error type for UrlGuard infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum UrlGuardError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for UrlGuard operations.
pub type UrlGuardResult<T> = Result<T, UrlGuardError>;
