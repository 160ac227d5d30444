//! Platform error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// The complete set of error kinds a public operation may surface.
///
/// Every service boundary returns one of these; nothing escapes as an
/// unhandled fault. `Internal` is the only kind a caller may retry; all
/// other kinds are deterministic for the same input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Request body failed structural validation. Reported to the caller,
    /// never logged as a server fault.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing, malformed, expired, or blacklisted credential. Callers are
    /// never told which.
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated but role/ownership check failed. Carries the rule that
    /// was violated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource absent, or an id malformed such that it cannot resolve to a
    /// document. The caller sees the same error either way.
    #[error("not found")]
    NotFound,

    /// Uniqueness or state conflict (duplicate organization per owner,
    /// duplicate join code, ...).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage unavailable, signing misconfiguration, and similar faults.
    /// Full detail is logged server-side; callers receive a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized(reason.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether a caller may retry the failed operation blindly.
    ///
    /// Only internal faults are retryable; every other kind is deterministic
    /// given the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}
