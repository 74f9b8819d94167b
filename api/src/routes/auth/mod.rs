//! Authentication route handlers
//!
//! This module contains all authentication-related endpoints:
//! - Login (credentials in, token pair out)
//! - Token rotation
//! - Logout (single session, and all sessions)
//! - Active-session listing

pub mod login;
pub mod logout;
pub mod refresh;
pub mod sessions;

use std::sync::Arc;

use actix_web::http::header::USER_AGENT;
use actix_web::HttpRequest;

use pw_core::domain::entities::session::ClientMeta;
use pw_core::repositories::{SessionRepository, UserRepository};
use pw_core::services::auth::{AuthService, CredentialVerifier};
use pw_core::services::token::TokenService;

/// Shared application state for the auth endpoints
pub struct AppState<U, R, V>
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    V: CredentialVerifier + 'static,
{
    pub auth_service: AuthService<U, R, V>,
    pub token_service: Arc<TokenService<R>>,
}

/// Captures the caller's IP and User-Agent for the session record
pub(crate) fn client_meta(req: &HttpRequest) -> ClientMeta {
    let ip_address = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    ClientMeta::new(ip_address, user_agent)
}
