//! Unit tests for the authentication service

use std::sync::Arc;

use crate::domain::entities::session::ClientMeta;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{InMemorySessionRepository, InMemoryUserRepository};
use crate::services::auth::{AuthService, CredentialVerifier};
use crate::services::token::{TokenService, TokenServiceConfig};

/// Verifier that treats the stored hash as the plaintext password
struct PlainEqualityVerifier;

impl CredentialVerifier for PlainEqualityVerifier {
    fn verify(&self, secret: &str, hash: &str) -> bool {
        secret == hash
    }
}

type TestAuthService =
    AuthService<InMemoryUserRepository, InMemorySessionRepository, PlainEqualityVerifier>;

async fn create_service_with_user(
    email: &str,
    password: &str,
) -> (TestAuthService, User, InMemorySessionRepository) {
    let users = InMemoryUserRepository::new();
    let user = User::new(email.to_string(), password.to_string());
    users.insert(user.clone()).await;

    let sessions = InMemorySessionRepository::new();
    let token_service = Arc::new(TokenService::new(
        sessions.clone(),
        TokenServiceConfig::default(),
    ));

    let service = AuthService::new(Arc::new(users), token_service, Arc::new(PlainEqualityVerifier));
    (service, user, sessions)
}

#[tokio::test]
async fn test_login_success() {
    let (service, user, _sessions) = create_service_with_user("ada@example.com", "hunter2").await;

    let pair = service
        .login("ada@example.com", "hunter2", ClientMeta::default())
        .await
        .unwrap();

    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());

    let listed = service.sessions(user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, pair.session_id);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (service, _user, _sessions) = create_service_with_user("ada@example.com", "hunter2").await;

    let result = service
        .login("ada@example.com", "wrong", ClientMeta::default())
        .await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_login_unknown_email_same_error() {
    let (service, _user, _sessions) = create_service_with_user("ada@example.com", "hunter2").await;

    let result = service
        .login("nobody@example.com", "hunter2", ClientMeta::default())
        .await;

    // Indistinguishable from a wrong password
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let (service, _user, _sessions) = create_service_with_user("ada@example.com", "hunter2").await;

    let pair = service
        .login("ada@example.com", "hunter2", ClientMeta::default())
        .await
        .unwrap();

    assert!(service.logout(&pair.refresh_token).await.unwrap());
    assert!(!service.logout(&pair.refresh_token).await.unwrap());
}

#[tokio::test]
async fn test_logout_all_from_two_devices() {
    let (service, user, _sessions) = create_service_with_user("ada@example.com", "hunter2").await;

    let phone_meta = ClientMeta::new(Some("192.0.2.1".to_string()), Some("pw-ios".to_string()));
    let web_meta = ClientMeta::new(Some("192.0.2.2".to_string()), Some("pw-web".to_string()));

    service
        .login("ada@example.com", "hunter2", phone_meta)
        .await
        .unwrap();
    service
        .login("ada@example.com", "hunter2", web_meta)
        .await
        .unwrap();

    assert_eq!(service.sessions(user.id).await.unwrap().len(), 2);

    let revoked = service.logout_all(user.id).await.unwrap();
    assert_eq!(revoked, 2);

    assert!(service.sessions(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_session_listing_records_client_meta() {
    let (service, user, _sessions) = create_service_with_user("ada@example.com", "hunter2").await;

    let meta = ClientMeta::new(Some("203.0.113.9".to_string()), Some("pw-android/3.0".to_string()));
    service
        .login("ada@example.com", "hunter2", meta)
        .await
        .unwrap();

    let listed = service.sessions(user.id).await.unwrap();
    assert_eq!(listed[0].ip_address.as_deref(), Some("203.0.113.9"));
    assert_eq!(listed[0].user_agent.as_deref(), Some("pw-android/3.0"));
}
