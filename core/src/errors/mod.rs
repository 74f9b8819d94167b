//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    /// Transient store failure (connection dropped, pool exhausted).
    /// Surfaced as 503 and retried once at the gate/rotation boundary,
    /// never downgraded to an authentication failure.
    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Whether retrying the operation once may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Store { .. })
    }

    /// Whether the error collapses to a generic 401 at the API boundary.
    /// Reuse detection and other precise kinds are kept out of responses
    /// so callers get no probe oracle; they survive only in logs.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            DomainError::Unauthorized | DomainError::Auth(_) | DomainError::Token(_)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_transient() {
        let err = DomainError::Store {
            message: "connection reset".to_string(),
        };
        assert!(err.is_transient());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_token_errors_collapse_to_unauthorized() {
        let err: DomainError = TokenError::TokenRevoked.into();
        assert!(err.is_unauthorized());
        assert!(!err.is_transient());

        let err: DomainError = AuthError::InvalidCredentials.into();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_internal_errors_do_not_collapse() {
        let err = DomainError::Internal {
            message: "bug".to_string(),
        };
        assert!(!err.is_unauthorized());
    }
}
