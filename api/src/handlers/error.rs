//! Translation of domain errors into HTTP responses.
//!
//! This is the only place error kinds become status codes. Every
//! authentication and token failure collapses into one generic 401 body:
//! whether a secret was unknown, expired, or detected as reused is kept out
//! of the wire format so probing callers learn nothing. Transient store
//! failures surface as 503 and are never downgraded to 401, so an
//! infrastructure blip cannot log users out. The precise kind is logged.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use pw_core::errors::DomainError;

use crate::dto::ErrorResponse;

/// Transport-level error, already stripped of anything probe-worthy
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed")]
    Unauthorized,

    #[error("Invalid request")]
    BadRequest,

    #[error("Resource not found")]
    NotFound,

    #[error("Service temporarily unavailable")]
    Unavailable,

    #[error("An internal error occurred")]
    Internal,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::BadRequest => "BAD_REQUEST",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Unavailable => "SERVICE_UNAVAILABLE",
            ApiError::Internal => "INTERNAL_ERROR",
        }
    }
}

impl From<&DomainError> for ApiError {
    fn from(error: &DomainError) -> Self {
        if error.is_unauthorized() {
            ApiError::Unauthorized
        } else if error.is_transient() {
            ApiError::Unavailable
        } else {
            match error {
                DomainError::Validation { .. } => ApiError::BadRequest,
                DomainError::NotFound { .. } => ApiError::NotFound,
                _ => ApiError::Internal,
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        ErrorResponse::new(self.code(), self.to_string()).to_response(self.status_code())
    }
}

/// Convert a domain error into the HTTP response handlers return.
///
/// The precise kind goes to the log here and nowhere else.
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let api_error = ApiError::from(error);
    match api_error {
        ApiError::Unauthorized | ApiError::BadRequest | ApiError::NotFound => {
            log::warn!("request rejected: {error}");
        }
        ApiError::Unavailable | ApiError::Internal => {
            log::error!("request failed: {error}");
        }
    }

    api_error.error_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_core::errors::{AuthError, TokenError};

    #[test]
    fn test_all_auth_kinds_collapse_to_one_401() {
        let kinds: Vec<DomainError> = vec![
            AuthError::InvalidCredentials.into(),
            TokenError::InvalidRefreshToken.into(),
            TokenError::RefreshTokenExpired.into(),
            TokenError::TokenRevoked.into(),
            TokenError::WrongTokenKind.into(),
        ];

        for kind in &kinds {
            let api_error = ApiError::from(kind);
            assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);
            // One message for everything: no reuse-detection oracle
            assert_eq!(api_error.to_string(), "Authentication failed");
        }
    }

    #[test]
    fn test_store_errors_are_503_not_401() {
        let error = DomainError::Store {
            message: "pool timed out".to_string(),
        };
        assert_eq!(
            ApiError::from(&error).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_internal_errors_are_500() {
        let error = DomainError::Internal {
            message: "bug".to_string(),
        };
        assert_eq!(
            ApiError::from(&error).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
