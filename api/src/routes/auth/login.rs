use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::auth::{AuthResponse, LoginRequest};
use crate::handlers::error::handle_domain_error;

use pw_core::repositories::{SessionRepository, UserRepository};
use pw_core::services::auth::CredentialVerifier;

use super::{client_meta, AppState};

/// Handler for POST /api/v1/auth/login
///
/// Verifies credentials and issues a fresh access/refresh pair, recording
/// the caller's IP and User-Agent on the new session.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "string",
///     "password": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "hex string",
///     "session_id": "uuid",
///     "expires_in": 900
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Unknown email or wrong password (indistinguishable)
/// - 503 Service Unavailable: Store failure
pub async fn login<U, R, V>(
    req: HttpRequest,
    state: web::Data<AppState<U, R, V>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    V: CredentialVerifier + 'static,
{
    let meta = client_meta(&req);

    match state
        .auth_service
        .login(&request.email, &request.password, meta)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(AuthResponse::from(pair)),
        Err(error) => handle_domain_error(&error),
    }
}
