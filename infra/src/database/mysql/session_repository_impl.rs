//! MySQL implementation of the SessionRepository trait.
//!
//! Refresh sessions are the only shared mutable state in the system, and
//! this module is where every mutation becomes a SQL statement. Revocations
//! are conditional updates decided by affected-row count, and the rotation
//! commit wraps its revoke-and-insert in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use pw_core::domain::entities::session::{RefreshSession, REVOKED_SESSION_RETENTION_DAYS};
use pw_core::errors::DomainError;
use pw_core::repositories::SessionRepository;

/// MySQL implementation of SessionRepository
#[derive(Clone)]
pub struct MySqlSessionRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    /// Create a new MySQL session repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshSession entity
    fn row_to_session(row: &sqlx::mysql::MySqlRow) -> Result<RefreshSession, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| internal(format!("failed to get id: {e}")))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| internal(format!("failed to get user_id: {e}")))?;

        Ok(RefreshSession {
            id: Uuid::parse_str(&id)
                .map_err(|e| internal(format!("invalid session UUID: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| internal(format!("invalid user UUID: {e}")))?,
            secret_hash: row
                .try_get("secret_hash")
                .map_err(|e| internal(format!("failed to get secret_hash: {e}")))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| internal(format!("failed to get created_at: {e}")))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| internal(format!("failed to get expires_at: {e}")))?,
            revoked: row
                .try_get("revoked")
                .map_err(|e| internal(format!("failed to get revoked: {e}")))?,
            ip_address: row
                .try_get("ip_address")
                .map_err(|e| internal(format!("failed to get ip_address: {e}")))?,
            user_agent: row
                .try_get("user_agent")
                .map_err(|e| internal(format!("failed to get user_agent: {e}")))?,
        })
    }
}

/// Row decoding problems are bugs, not infrastructure blips
fn internal(message: String) -> DomainError {
    DomainError::Internal { message }
}

/// Statement-level failures count as transient store trouble; the service
/// layer decides whether to retry and the transport answers 503, not 401
fn store(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Store {
        message: format!("{context}: {e}"),
    }
}

const INSERT_SESSION: &str = r#"
    INSERT INTO sessions (
        id, user_id, secret_hash, created_at, expires_at, revoked, ip_address, user_agent
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn create(&self, session: RefreshSession) -> Result<RefreshSession, DomainError> {
        sqlx::query(INSERT_SESSION)
            .bind(session.id.to_string())
            .bind(session.user_id.to_string())
            .bind(&session.secret_hash)
            .bind(session.created_at)
            .bind(session.expires_at)
            .bind(session.revoked)
            .bind(&session.ip_address)
            .bind(&session.user_agent)
            .execute(&self.pool)
            .await
            .map_err(|e| store("failed to save session", e))?;

        Ok(session)
    }

    async fn find_by_secret_hash(
        &self,
        secret_hash: &str,
    ) -> Result<Option<RefreshSession>, DomainError> {
        let query = r#"
            SELECT id, user_id, secret_hash, created_at, expires_at, revoked, ip_address, user_agent
            FROM sessions
            WHERE secret_hash = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(secret_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store("failed to find session", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_session(&row)?)),
            None => Ok(None),
        }
    }

    async fn revoke(&self, id: Uuid) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE sessions
            SET revoked = TRUE
            WHERE id = ? AND revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| store("failed to revoke session", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn consume_and_replace(
        &self,
        presented_hash: &str,
        replacement: RefreshSession,
    ) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store("failed to begin rotation transaction", e))?;

        // The claim: of any number of concurrent rotations of this secret,
        // exactly one sees an affected row here
        let claimed = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked = TRUE
            WHERE secret_hash = ? AND revoked = FALSE
            "#,
        )
        .bind(presented_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| store("failed to claim session for rotation", e))?;

        if claimed.rows_affected() == 0 {
            // Nothing claimed, nothing to undo
            tx.rollback()
                .await
                .map_err(|e| store("failed to roll back rotation", e))?;
            return Ok(false);
        }

        sqlx::query(INSERT_SESSION)
            .bind(replacement.id.to_string())
            .bind(replacement.user_id.to_string())
            .bind(&replacement.secret_hash)
            .bind(replacement.created_at)
            .bind(replacement.expires_at)
            .bind(replacement.revoked)
            .bind(&replacement.ip_address)
            .bind(&replacement.user_agent)
            .execute(&mut *tx)
            .await
            .map_err(|e| store("failed to insert replacement session", e))?;

        // If the caller is cancelled before this point the transaction is
        // dropped and rolled back: the claim and the insert land together
        // or not at all
        tx.commit()
            .await
            .map_err(|e| store("failed to commit rotation", e))?;

        Ok(true)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        // One bulk statement: a concurrent active-session listing sees the
        // set before or after, never half revoked
        let query = r#"
            UPDATE sessions
            SET revoked = TRUE
            WHERE user_id = ? AND revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| store("failed to revoke user sessions", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn list_active(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshSession>, DomainError> {
        let query = r#"
            SELECT id, user_id, secret_hash, created_at, expires_at, revoked, ip_address, user_agent
            FROM sessions
            WHERE user_id = ?
                AND revoked = FALSE
                AND expires_at > ?
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store("failed to list active sessions", e))?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in rows {
            sessions.push(Self::row_to_session(&row)?);
        }

        Ok(sessions)
    }

    async fn delete_expired_or_revoked(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let retention_cutoff = now - Duration::days(REVOKED_SESSION_RETENTION_DAYS);
        let query = r#"
            DELETE FROM sessions
            WHERE expires_at < ? OR (revoked = TRUE AND created_at < ?)
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .bind(retention_cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| store("failed to delete stale sessions", e))?;

        Ok(result.rows_affected() as usize)
    }
}
