//! In-memory implementation of SessionRepository.
//!
//! Backs the unit and integration test suites; every operation takes the
//! single map lock for its whole duration, which makes each repository call
//! atomic the same way a database statement or transaction is.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::session::{RefreshSession, REVOKED_SESSION_RETENTION_DAYS};
use crate::errors::DomainError;

use super::r#trait::SessionRepository;

/// In-memory session repository keyed by secret hash
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, RefreshSession>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held, revoked or not. Test helper.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: RefreshSession) -> Result<RefreshSession, DomainError> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&session.secret_hash) {
            return Err(DomainError::Validation {
                message: "Session secret already exists".to_string(),
            });
        }

        sessions.insert(session.secret_hash.clone(), session.clone());
        Ok(session)
    }

    async fn find_by_secret_hash(
        &self,
        secret_hash: &str,
    ) -> Result<Option<RefreshSession>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(secret_hash).cloned())
    }

    async fn revoke(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.write().await;

        match sessions.values_mut().find(|s| s.id == id && !s.revoked) {
            Some(session) => {
                session.revoke();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn consume_and_replace(
        &self,
        presented_hash: &str,
        replacement: RefreshSession,
    ) -> Result<bool, DomainError> {
        // One write lock across claim and insert: either both happen or
        // neither does, and only one concurrent caller claims the row.
        let mut sessions = self.sessions.write().await;

        let claimed = match sessions.get_mut(presented_hash) {
            Some(presented) if !presented.revoked => {
                presented.revoke();
                true
            }
            _ => false,
        };

        if claimed {
            sessions.insert(replacement.secret_hash.clone(), replacement);
        }

        Ok(claimed)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut sessions = self.sessions.write().await;
        let mut count = 0;

        for session in sessions.values_mut() {
            if session.user_id == user_id && !session.revoked {
                session.revoke();
                count += 1;
            }
        }

        Ok(count)
    }

    async fn list_active(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshSession>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut active: Vec<RefreshSession> = sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active_at(now))
            .cloned()
            .collect();

        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn delete_expired_or_revoked(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let retention_cutoff = now - Duration::days(REVOKED_SESSION_RETENTION_DAYS);
        let mut sessions = self.sessions.write().await;
        let initial_count = sessions.len();

        sessions.retain(|_, s| {
            !s.is_expired_at(now) && !(s.revoked && s.created_at < retention_cutoff)
        });

        Ok(initial_count - sessions.len())
    }
}
