//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// conflicts, missing records). Storage failures belong to the layers that
/// talk to storage.
///
/// Every variant carries the human-readable message that callers surface
/// as-is (e.g. in an HTTP error body).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation or a domain rule rejected it (e.g. under-age).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Uniqueness violation or an invalid state transition.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referenced record does not exist (or is no longer active).
    #[error("not found: {0}")]
    NotFound(String),

    /// The actor is not allowed to perform the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// The bare message, without the kind prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::InvalidId(msg) => msg,
        }
    }
}
