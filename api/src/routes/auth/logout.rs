use actix_web::{web, HttpResponse};

use crate::dto::auth::{LogoutAllResponse, LogoutRequest, LogoutResponse};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use pw_core::repositories::{SessionRepository, UserRepository};
use pw_core::services::auth::CredentialVerifier;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Ends exactly the session backing the presented refresh secret.
/// Possession of the secret is the authentication: a client whose access
/// token already expired can still log out. Idempotent; logging out a
/// session twice is a no-op, not an error.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out"
/// }
/// ```
pub async fn logout<U, R, V>(
    state: web::Data<AppState<U, R, V>>,
    request: web::Json<LogoutRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    V: CredentialVerifier + 'static,
{
    match state.auth_service.logout(&request.refresh_token).await {
        // Whether the session existed or was already revoked is not
        // something the response distinguishes
        Ok(_) => HttpResponse::Ok().json(LogoutResponse {
            message: "Logged out".to_string(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for POST /api/v1/auth/logout-all
///
/// Revokes every session of the authenticated user in one bulk update.
/// Requires a valid access token and a live session.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "revoked": 2
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing/invalid access token or no live session
pub async fn logout_all<U, R, V>(
    state: web::Data<AppState<U, R, V>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    V: CredentialVerifier + 'static,
{
    match state.auth_service.logout_all(auth.user_id).await {
        Ok(revoked) => HttpResponse::Ok().json(LogoutAllResponse { revoked }),
        Err(error) => handle_domain_error(&error),
    }
}
