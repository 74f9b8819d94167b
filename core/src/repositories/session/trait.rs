//! Session repository trait defining the interface for refresh session persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::session::RefreshSession;
use crate::errors::DomainError;

/// Repository trait for RefreshSession persistence.
///
/// This is the single shared mutable resource of the token lifecycle: every
/// piece of session state is read and written through these operations, and
/// nothing else in the process holds mutable state.
///
/// # Consistency requirements
/// - `revoke` and `consume_and_replace` are conditional updates decided by
///   affected-row count, so concurrent callers racing on the same row get
///   exactly one winner.
/// - `revoke_all_for_user` is one bulk statement, never a per-row loop, so a
///   concurrent `list_active` never observes a partially revoked set.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new refresh session
    ///
    /// # Returns
    /// * `Ok(RefreshSession)` - The saved session
    /// * `Err(DomainError)` - Save failed (e.g., duplicate secret hash)
    async fn create(&self, session: RefreshSession) -> Result<RefreshSession, DomainError>;

    /// Find a session by the hash of its refresh secret
    ///
    /// # Returns
    /// * `Ok(Some(RefreshSession))` - Session found (revoked or not)
    /// * `Ok(None)` - No session with this secret ever existed, or it was
    ///   already purged by the reaper
    async fn find_by_secret_hash(
        &self,
        secret_hash: &str,
    ) -> Result<Option<RefreshSession>, DomainError>;

    /// Revoke a specific session. Idempotent: revoking an already revoked
    /// session is a no-op reported as `false`.
    ///
    /// # Returns
    /// * `Ok(true)` - Session was active and is now revoked
    /// * `Ok(false)` - Session not found or already revoked
    async fn revoke(&self, id: Uuid) -> Result<bool, DomainError>;

    /// The rotation commit point: atomically revoke the session identified
    /// by `presented_hash` and insert `replacement`, as one unit.
    ///
    /// The revocation is conditional on the presented session still being
    /// unrevoked; when two rotations race on the same secret, exactly one
    /// observes the claim succeed. The replacement row must never become
    /// visible without the presented row being revoked, and an abandoned
    /// call must not leave the presented row revoked without the
    /// replacement inserted.
    ///
    /// # Returns
    /// * `Ok(true)` - This caller won the claim; the replacement is live
    /// * `Ok(false)` - The presented session was already consumed
    async fn consume_and_replace(
        &self,
        presented_hash: &str,
        replacement: RefreshSession,
    ) -> Result<bool, DomainError>;

    /// Revoke every unrevoked session of a user in one bulk update
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of sessions revoked
    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// List the user's active sessions (unrevoked and unexpired at `now`),
    /// newest first
    async fn list_active(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshSession>, DomainError>;

    /// Delete rows the lifecycle no longer needs: expired sessions, and
    /// revoked sessions older than the retention window kept for reuse
    /// detection. Storage hygiene only; correctness never depends on it.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of sessions deleted
    async fn delete_expired_or_revoked(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
