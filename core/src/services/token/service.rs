//! Main token service implementation

use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::session::{Claims, ClientMeta, RefreshSession, TokenPair};
use crate::errors::{DomainError, TokenError};
use crate::repositories::SessionRepository;

use super::config::TokenServiceConfig;
use super::issuer::TokenIssuer;

/// Backoff before the single retry of a transient store failure
const STORE_RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Service managing the refresh session lifecycle: issuance, rotation with
/// reuse detection, revocation, and the per-request live-session check.
pub struct TokenService<R: SessionRepository> {
    pub(crate) repository: R,
    config: TokenServiceConfig,
    issuer: TokenIssuer,
}

impl<R: SessionRepository> TokenService<R> {
    /// Creates a new token service instance
    pub fn new(repository: R, config: TokenServiceConfig) -> Self {
        let issuer = TokenIssuer::new(&config);
        Self {
            repository,
            config,
            issuer,
        }
    }

    /// Issues a new session for a freshly authenticated user.
    ///
    /// Mints an access token, generates a refresh secret, and persists the
    /// session row recording the client metadata.
    pub async fn issue_session(
        &self,
        user_id: Uuid,
        client_meta: ClientMeta,
    ) -> Result<TokenPair, DomainError> {
        let now = Utc::now();
        let (raw_secret, secret_hash) = self.issuer.generate_secret();

        let session = RefreshSession::new(
            user_id,
            secret_hash,
            client_meta,
            now,
            self.config.refresh_token_expiry_days,
        );
        let access_token = self.issuer.issue_access_token(user_id, now)?;

        let stored = self.repository.create(session).await?;
        debug!(user_id = %user_id, session_id = %stored.id, "issued new session");

        Ok(TokenPair::new(
            access_token,
            raw_secret,
            stored.id,
            self.config.access_token_expiry_minutes,
        ))
    }

    /// Rotates a refresh session: the presented secret is retired and a
    /// replacement pair is issued for the same user.
    ///
    /// State machine for the presented secret, evaluated against a single
    /// wall-clock instant captured at entry:
    /// - unknown secret: rejected
    /// - already revoked: reuse of a consumed secret; every session of the
    ///   owning user is revoked in one bulk update, then rejected
    /// - expired: marked revoked as a side effect, then rejected
    /// - valid: the replacement is committed through
    ///   `consume_and_replace`; losing that claim to a concurrent rotation
    ///   is handled like reuse
    ///
    /// Callers never learn which branch rejected them; the distinction
    /// lives in logs only.
    pub async fn rotate(
        &self,
        refresh_secret: &str,
        client_meta: ClientMeta,
    ) -> Result<TokenPair, DomainError> {
        let now = Utc::now();
        let presented_hash = TokenIssuer::hash_secret(refresh_secret);

        let session = match self.find_with_retry(&presented_hash).await? {
            Some(session) => session,
            None => {
                debug!("rotation rejected: unknown refresh secret");
                return Err(DomainError::Token(TokenError::InvalidRefreshToken));
            }
        };

        if session.revoked {
            warn!(
                user_id = %session.user_id,
                session_id = %session.id,
                "refresh secret reuse detected, revoking all sessions for user"
            );
            self.repository.revoke_all_for_user(session.user_id).await?;
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }

        if session.is_expired_at(now) {
            self.repository.revoke(session.id).await?;
            debug!(session_id = %session.id, "rotation rejected: session expired");
            return Err(DomainError::Token(TokenError::RefreshTokenExpired));
        }

        let (raw_secret, secret_hash) = self.issuer.generate_secret();
        let replacement = RefreshSession::new(
            session.user_id,
            secret_hash,
            client_meta,
            now,
            self.config.refresh_token_expiry_days,
        );
        let replacement_id = replacement.id;
        let access_token = self.issuer.issue_access_token(session.user_id, now)?;

        if !self
            .repository
            .consume_and_replace(&presented_hash, replacement)
            .await?
        {
            // A concurrent rotation consumed this secret between our read
            // and the claim. Same theft signal as presenting it twice.
            warn!(
                user_id = %session.user_id,
                session_id = %session.id,
                "refresh secret consumed concurrently, revoking all sessions for user"
            );
            self.repository.revoke_all_for_user(session.user_id).await?;
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }

        debug!(
            user_id = %session.user_id,
            old_session_id = %session.id,
            new_session_id = %replacement_id,
            "session rotated"
        );

        Ok(TokenPair::new(
            access_token,
            raw_secret,
            replacement_id,
            self.config.access_token_expiry_minutes,
        ))
    }

    /// Revokes the session backing the presented refresh secret.
    ///
    /// Idempotent: revoking a secret twice, or one that never existed,
    /// reports `false` rather than failing.
    pub async fn revoke_session(&self, refresh_secret: &str) -> Result<bool, DomainError> {
        let secret_hash = TokenIssuer::hash_secret(refresh_secret);

        match self.repository.find_by_secret_hash(&secret_hash).await? {
            Some(session) => self.repository.revoke(session.id).await,
            None => Ok(false),
        }
    }

    /// Revokes every session of a user in one bulk update
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of sessions revoked
    pub async fn revoke_all(&self, user_id: Uuid) -> Result<usize, DomainError> {
        self.repository.revoke_all_for_user(user_id).await
    }

    /// Lists the user's active sessions, newest first
    pub async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<RefreshSession>, DomainError> {
        self.repository.list_active(user_id, Utc::now()).await
    }

    /// Verifies an access token's signature, expiry, and kind
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.issuer.verify_access_token(token)
    }

    /// Looks up a session by its secret hash, retrying once on a transient
    /// store failure so an infrastructure blip is not mistaken for an
    /// invalid token.
    async fn find_with_retry(
        &self,
        secret_hash: &str,
    ) -> Result<Option<RefreshSession>, DomainError> {
        match self.repository.find_by_secret_hash(secret_hash).await {
            Err(e) if e.is_transient() => {
                warn!("transient store failure during session lookup, retrying: {e}");
                tokio::time::sleep(STORE_RETRY_BACKOFF).await;
                self.repository.find_by_secret_hash(secret_hash).await
            }
            other => other,
        }
    }

    /// Lists active sessions with the same single retry
    async fn list_active_with_retry(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RefreshSession>, DomainError> {
        let now = Utc::now();
        match self.repository.list_active(user_id, now).await {
            Err(e) if e.is_transient() => {
                warn!("transient store failure during live-session check, retrying: {e}");
                tokio::time::sleep(STORE_RETRY_BACKOFF).await;
                self.repository.list_active(user_id, now).await
            }
            other => other,
        }
    }
}

/// Per-request authentication: token verification plus the live-session
/// check. Object-safe so the HTTP middleware can hold it behind `dyn`.
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    /// Authenticates a bearer access token.
    ///
    /// The signature and embedded expiry are necessary but not sufficient:
    /// the user must also still have at least one active session, which is
    /// what makes server-side logout and cascade revocation take effect
    /// before the access token's own expiry elapses.
    async fn authenticate(&self, access_token: &str) -> Result<Uuid, DomainError>;
}

#[async_trait]
impl<R: SessionRepository> SessionAuthenticator for TokenService<R> {
    async fn authenticate(&self, access_token: &str) -> Result<Uuid, DomainError> {
        let claims = self.verify_access_token(access_token)?;
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))?;

        let active = self.list_active_with_retry(user_id).await?;
        if active.is_empty() {
            debug!(user_id = %user_id, "access token valid but no live session");
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }

        Ok(user_id)
    }
}
