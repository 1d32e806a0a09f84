//! Error types for the engagement and reviews core.
//!
//! [`EngagementError`] is the central error type. Each variant corresponds
//! to one class of the failure taxonomy: bad user input, an unreachable or
//! failing remote document store, or unavailable browser-local storage.

use serde::Serialize;

/// Coarse failure class, used by callers and tests to branch on the kind
/// of failure without matching variant payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected before any network call; surfaced to the caller for display.
    Validation,
    /// Remote document store unreachable or refused the operation.
    Transport,
    /// Browser-local storage disabled or full.
    LocalStorage,
}

/// Central error enum for the engagement core.
///
/// Read paths recover from `Transport` locally (cache, seed list, zeroed
/// defaults) and never surface it; the review-creation write path propagates
/// it. `LocalStorage` is always recovered with an in-memory default. No
/// variant is fatal.
#[derive(Debug, thiserror::Error)]
pub enum EngagementError {
    /// Review input failed validation.
    #[error("invalid review: {0}")]
    Validation(String),

    /// Remote document store operation failed.
    #[error("remote store error: {0}")]
    Transport(String),

    /// Local key-value storage operation failed.
    #[error("local storage error: {0}")]
    LocalStorage(String),
}

impl EngagementError {
    /// Returns the failure class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::LocalStorage(_) => ErrorKind::LocalStorage,
        }
    }

    /// True if this error was raised before any network call was attempted.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<sqlx::Error> for EngagementError {
    fn from(err: sqlx::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_variants() {
        assert_eq!(
            EngagementError::Validation("empty name".to_string()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            EngagementError::Transport("unreachable".to_string()).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            EngagementError::LocalStorage("quota exceeded".to_string()).kind(),
            ErrorKind::LocalStorage
        );
    }

    #[test]
    fn display_includes_detail() {
        let err = EngagementError::Validation("rating out of range".to_string());
        assert_eq!(err.to_string(), "invalid review: rating out of range");
        assert!(err.is_validation());
    }
}
