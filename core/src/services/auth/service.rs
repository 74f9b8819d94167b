//! Main authentication service implementation

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::session::{ClientMeta, RefreshSession, TokenPair};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{SessionRepository, UserRepository};
use crate::services::token::TokenService;

use super::verifier::CredentialVerifier;

/// Authentication service for the login-facing flow
pub struct AuthService<U, R, V>
where
    U: UserRepository,
    R: SessionRepository,
    V: CredentialVerifier,
{
    /// User repository for credential lookups
    user_repository: Arc<U>,
    /// Token service owning the session lifecycle
    token_service: Arc<TokenService<R>>,
    /// Opaque credential verification capability
    credential_verifier: Arc<V>,
}

impl<U, R, V> AuthService<U, R, V>
where
    U: UserRepository,
    R: SessionRepository,
    V: CredentialVerifier,
{
    /// Create a new authentication service
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService<R>>,
        credential_verifier: Arc<V>,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            credential_verifier,
        }
    }

    /// Authenticates a user and issues a new session.
    ///
    /// An unknown email and a wrong password take the same exit: callers
    /// cannot probe which addresses have accounts.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client_meta: ClientMeta,
    ) -> Result<TokenPair, DomainError> {
        let user = self.user_repository.find_by_email(email).await?;

        let user = match user {
            Some(user) if self.credential_verifier.verify(password, &user.password_hash) => user,
            _ => {
                debug!("login rejected for {email}");
                return Err(DomainError::Auth(AuthError::InvalidCredentials));
            }
        };

        let pair = self.token_service.issue_session(user.id, client_meta).await?;
        info!(user_id = %user.id, session_id = %pair.session_id, "user logged in");
        Ok(pair)
    }

    /// Ends exactly the session backing the presented refresh secret.
    ///
    /// Idempotent; possession of the secret is the authentication, so a
    /// client whose access token already expired can still log out.
    pub async fn logout(&self, refresh_secret: &str) -> Result<bool, DomainError> {
        self.token_service.revoke_session(refresh_secret).await
    }

    /// Ends every session of the authenticated user in one bulk update
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of sessions revoked
    pub async fn logout_all(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let revoked = self.token_service.revoke_all(user_id).await?;
        info!(user_id = %user_id, revoked, "user logged out everywhere");
        Ok(revoked)
    }

    /// Lists the user's active sessions, newest first
    pub async fn sessions(&self, user_id: Uuid) -> Result<Vec<RefreshSession>, DomainError> {
        self.token_service.list_sessions(user_id).await
    }
}
