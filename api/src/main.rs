use actix_web::{web, HttpServer};
use dotenv::dotenv;
use log::info;
use std::sync::Arc;

use pw_api::app::create_app;
use pw_api::config::Config;
use pw_api::routes::auth::AppState;

use pw_core::services::auth::AuthService;
use pw_core::services::token::{
    SessionAuthenticator, SessionCleanupConfig, SessionCleanupService, TokenService,
};
use pw_infra::database::{create_pool, MySqlSessionRepository, MySqlUserRepository};
use pw_infra::security::BcryptVerifier;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting PennyWise API server");

    let config = Config::from_env()?;

    // Database pool and repositories
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    let session_repository = MySqlSessionRepository::new(pool.clone());
    let user_repository = MySqlUserRepository::new(pool.clone());

    // Token lifecycle services
    let token_service = Arc::new(TokenService::new(
        session_repository.clone(),
        config.token_config(),
    ));
    let authenticator: Arc<dyn SessionAuthenticator> = token_service.clone();

    // Background reaper keeping the session table bounded
    let cleanup_service = Arc::new(SessionCleanupService::new(
        Arc::new(session_repository),
        SessionCleanupConfig {
            interval_seconds: config.cleanup_interval_seconds,
            enabled: true,
        },
    ));
    cleanup_service.start_background_task();

    // Login-facing service
    let auth_service = AuthService::new(
        Arc::new(user_repository),
        token_service.clone(),
        Arc::new(BcryptVerifier::new()),
    );

    let app_state = web::Data::new(AppState {
        auth_service,
        token_service,
    });
    let authenticator_data = web::Data::new(authenticator);

    let bind_address = config.bind_address();
    info!("Server will bind to: {bind_address}");

    HttpServer::new(move || create_app(app_state.clone(), authenticator_data.clone()))
        .bind(&bind_address)?
        .run()
        .await?;

    Ok(())
}
