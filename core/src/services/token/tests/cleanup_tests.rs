//! Unit tests for the session cleanup service

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::session::{ClientMeta, RefreshSession};
use crate::repositories::{InMemorySessionRepository, SessionRepository};
use crate::services::token::{CleanupResult, SessionCleanupConfig, SessionCleanupService};

#[tokio::test]
async fn test_cleanup_deletes_expired_sessions() {
    let repo = InMemorySessionRepository::new();
    let user_id = Uuid::new_v4();

    let mut expired = RefreshSession::new(
        user_id,
        "expired_hash".to_string(),
        ClientMeta::default(),
        Utc::now() - Duration::days(40),
        30,
    );
    expired.expires_at = Utc::now() - Duration::days(10);
    repo.create(expired).await.unwrap();

    repo.create(RefreshSession::new(
        user_id,
        "live_hash".to_string(),
        ClientMeta::default(),
        Utc::now(),
        30,
    ))
    .await
    .unwrap();

    let service = SessionCleanupService::new(
        Arc::new(repo.clone()),
        SessionCleanupConfig::default(),
    );

    let result = service.run_cleanup().await.unwrap();
    assert_eq!(result.sessions_deleted, 1);

    assert!(repo.find_by_secret_hash("expired_hash").await.unwrap().is_none());
    assert!(repo.find_by_secret_hash("live_hash").await.unwrap().is_some());
}

#[tokio::test]
async fn test_cleanup_preserves_recent_revocations() {
    let repo = InMemorySessionRepository::new();
    let user_id = Uuid::new_v4();

    // Revoked yesterday: must survive the sweep so secret reuse stays
    // detectable
    let session = repo
        .create(RefreshSession::new(
            user_id,
            "revoked_hash".to_string(),
            ClientMeta::default(),
            Utc::now() - Duration::days(1),
            30,
        ))
        .await
        .unwrap();
    repo.revoke(session.id).await.unwrap();

    let service = SessionCleanupService::new(
        Arc::new(repo.clone()),
        SessionCleanupConfig::default(),
    );

    let result = service.run_cleanup().await.unwrap();
    assert_eq!(result.sessions_deleted, 0);
    assert!(repo.find_by_secret_hash("revoked_hash").await.unwrap().is_some());
}

#[tokio::test]
async fn test_cleanup_disabled() {
    let repo = InMemorySessionRepository::new();
    let user_id = Uuid::new_v4();

    let mut expired = RefreshSession::new(
        user_id,
        "expired_hash".to_string(),
        ClientMeta::default(),
        Utc::now() - Duration::days(40),
        30,
    );
    expired.expires_at = Utc::now() - Duration::days(10);
    repo.create(expired).await.unwrap();

    let config = SessionCleanupConfig {
        enabled: false,
        ..SessionCleanupConfig::default()
    };
    let service = SessionCleanupService::new(Arc::new(repo.clone()), config);

    let result = service.run_cleanup().await.unwrap();
    assert_eq!(result, CleanupResult::default());
    assert_eq!(repo.len().await, 1);
}
