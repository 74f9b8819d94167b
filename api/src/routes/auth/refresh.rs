use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::auth::{AuthResponse, RefreshTokenRequest};
use crate::handlers::error::handle_domain_error;

use pw_core::repositories::{SessionRepository, UserRepository};
use pw_core::services::auth::CredentialVerifier;

use super::{client_meta, AppState};

/// Handler for POST /api/v1/auth/refresh
///
/// Rotates a refresh session: the presented secret is retired and a new
/// access/refresh pair is issued. Presenting an already-consumed secret
/// revokes every session of the owning user and fails like any other
/// invalid token.
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
///     "access_token": "eyJ...",
///     "refresh_token": "new secret",
///     "session_id": "uuid",
///     "expires_in": 900
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Unknown, expired, revoked, or reused refresh token
/// - 503 Service Unavailable: Store failure
pub async fn refresh<U, R, V>(
    req: HttpRequest,
    state: web::Data<AppState<U, R, V>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    V: CredentialVerifier + 'static,
{
    let meta = client_meta(&req);

    match state
        .token_service
        .rotate(&request.refresh_token, meta)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(AuthResponse::from(pair)),
        Err(error) => handle_domain_error(&error),
    }
}
