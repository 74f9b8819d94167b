use actix_web::{web, HttpResponse};

use crate::dto::auth::SessionInfo;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use pw_core::repositories::{SessionRepository, UserRepository};
use pw_core::services::auth::CredentialVerifier;

use super::AppState;

/// Handler for GET /api/v1/auth/sessions
///
/// Lists the authenticated user's active sessions, newest first. Secrets
/// never appear in the listing; each entry carries the explicit session id
/// clients use to reason about "this device".
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// [
///     {
///         "id": "uuid",
///         "ip_address": "203.0.113.9",
///         "user_agent": "pw-ios/2.1",
///         "created_at": "2024-05-01T10:00:00Z",
///         "expires_at": "2024-05-31T10:00:00Z"
///     }
/// ]
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing/invalid access token or no live session
pub async fn sessions<U, R, V>(
    state: web::Data<AppState<U, R, V>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    V: CredentialVerifier + 'static,
{
    match state.auth_service.sessions(auth.user_id).await {
        Ok(sessions) => {
            let listing: Vec<SessionInfo> = sessions.into_iter().map(SessionInfo::from).collect();
            HttpResponse::Ok().json(listing)
        }
        Err(error) => handle_domain_error(&error),
    }
}
