//! Application factory
//!
//! Builds the actix-web application with all routes and middleware wired.
//! The session gate wraps exactly the routes that require an authenticated
//! subject; login, refresh, and logout authenticate by credentials or by
//! possession of the refresh secret instead.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse};

use crate::middleware::{auth::SessionGate, cors::create_cors};
use crate::routes::auth::{
    login::login, logout::logout, logout::logout_all, refresh::refresh, sessions::sessions,
    AppState,
};

use pw_core::repositories::{SessionRepository, UserRepository};
use pw_core::services::auth::CredentialVerifier;
use pw_core::services::token::SessionAuthenticator;

/// Create and configure the application with all dependencies
pub fn create_app<U, R, V>(
    app_state: web::Data<AppState<U, R, V>>,
    authenticator: web::Data<Arc<dyn SessionAuthenticator>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    V: CredentialVerifier + 'static,
{
    let cors = create_cors();

    App::new()
        // Add application state
        .app_data(app_state)
        .app_data(authenticator)
        // Middleware (order matters: CORS outermost, then logging)
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(login::<U, R, V>))
                    .route("/refresh", web::post().to(refresh::<U, R, V>))
                    .route("/logout", web::post().to(logout::<U, R, V>))
                    .route(
                        "/logout-all",
                        web::post()
                            .to(logout_all::<U, R, V>)
                            .wrap(SessionGate::new()),
                    )
                    .route(
                        "/sessions",
                        web::get().to(sessions::<U, R, V>).wrap(SessionGate::new()),
                    ),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "pennywise-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Fallback handler for unknown routes
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "NOT_FOUND",
        "message": "The requested resource does not exist",
    }))
}
