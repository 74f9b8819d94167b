//! Session and token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh session expiration time (30 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

/// How long revoked sessions are kept before the reaper deletes them.
/// Keeping them around is what makes reuse of a rotated secret detectable.
pub const REVOKED_SESSION_RETENTION_DAYS: i64 = 30;

/// JWT issuer
pub const JWT_ISSUER: &str = "pennywise";

/// Discriminator carried in every signed token so an access token can never
/// be accepted where a refresh secret is required, or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims structure for the JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Token kind discriminator
    pub kind: TokenKind,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an access token.
    ///
    /// All timestamps derive from the single `now` the caller captured, so
    /// one logical operation never makes inconsistent expiry decisions.
    pub fn new_access_token(user_id: Uuid, now: DateTime<Utc>, expiry_minutes: i64) -> Self {
        let expiry = now + Duration::minutes(expiry_minutes);

        Self {
            sub: user_id.to_string(),
            kind: TokenKind::Access,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: JWT_ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks whether the claims are expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Client metadata recorded when a session is created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMeta {
    /// Client IP address as reported by the connection
    pub ip_address: Option<String>,

    /// User-Agent header of the client
    pub user_agent: Option<String>,
}

impl ClientMeta {
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address,
            user_agent,
        }
    }
}

/// Refresh session entity stored in the database.
///
/// The raw secret is never persisted; only its SHA-256 hash. A secret is
/// immutable once created: rotation revokes this row and inserts a new one,
/// which is what preserves the audit trail reuse detection depends on.
/// `revoked` only ever moves from `false` to `true`, and `expires_at` is
/// fixed at creation and never extended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    /// Unique identifier for the session
    pub id: Uuid,

    /// User this session belongs to
    pub user_id: Uuid,

    /// SHA-256 hash of the refresh secret
    pub secret_hash: String,

    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the session expires
    pub expires_at: DateTime<Utc>,

    /// Whether the session has been revoked
    pub revoked: bool,

    /// Client IP address recorded at creation
    pub ip_address: Option<String>,

    /// Client User-Agent recorded at creation
    pub user_agent: Option<String>,
}

impl RefreshSession {
    /// Creates a new refresh session expiring `expiry_days` after `now`
    pub fn new(
        user_id: Uuid,
        secret_hash: String,
        client_meta: ClientMeta,
        now: DateTime<Utc>,
        expiry_days: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            secret_hash,
            created_at: now,
            expires_at: now + Duration::days(expiry_days),
            revoked: false,
            ip_address: client_meta.ip_address,
            user_agent: client_meta.user_agent,
        }
    }

    /// Checks whether the session is expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// A session is active if it is neither revoked nor expired
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired_at(now)
    }

    /// Revokes the session. Monotone: there is no way back to `false`.
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}

/// Token pair returned to the client after login or rotation.
///
/// Carries the explicit session identifier so clients echo it back instead
/// of inferring "current session" from list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed JWT access token
    pub access_token: String,

    /// Raw refresh secret (opaque, high-entropy)
    pub refresh_token: String,

    /// Identifier of the refresh session backing this pair
    pub session_id: Uuid,

    /// Access token expiry time in seconds
    pub expires_in: i64,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        session_id: Uuid,
        access_expiry_minutes: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            session_id,
            expires_in: access_expiry_minutes * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_claims() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let claims = Claims::new_access_token(user_id, now, ACCESS_TOKEN_EXPIRY_MINUTES);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.iss, JWT_ISSUER);
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_EXPIRY_MINUTES * 60);
        assert!(!claims.is_expired_at(now));
    }

    #[test]
    fn test_claims_user_id_parsing() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new_access_token(user_id, Utc::now(), 15);

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_claims_expiration() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let claims = Claims::new_access_token(user_id, now, 15);

        assert!(claims.is_expired_at(now + Duration::minutes(16)));
        assert!(!claims.is_expired_at(now + Duration::minutes(14)));
    }

    #[test]
    fn test_token_kind_serialization() {
        let json = serde_json::to_string(&TokenKind::Access).unwrap();
        assert_eq!(json, "\"access\"");
        let json = serde_json::to_string(&TokenKind::Refresh).unwrap();
        assert_eq!(json, "\"refresh\"");
    }

    #[test]
    fn test_refresh_session_creation() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let meta = ClientMeta::new(Some("10.0.0.1".to_string()), Some("pw-ios/2.1".to_string()));
        let session = RefreshSession::new(
            user_id,
            "secret_hash_value".to_string(),
            meta,
            now,
            REFRESH_TOKEN_EXPIRY_DAYS,
        );

        assert_eq!(session.user_id, user_id);
        assert_eq!(session.secret_hash, "secret_hash_value");
        assert_eq!(session.created_at, now);
        assert_eq!(session.expires_at, now + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS));
        assert_eq!(session.ip_address.as_deref(), Some("10.0.0.1"));
        assert!(!session.revoked);
        assert!(session.is_active_at(now));
    }

    #[test]
    fn test_refresh_session_revocation() {
        let now = Utc::now();
        let mut session = RefreshSession::new(
            Uuid::new_v4(),
            "hash".to_string(),
            ClientMeta::default(),
            now,
            REFRESH_TOKEN_EXPIRY_DAYS,
        );

        assert!(session.is_active_at(now));

        session.revoke();

        assert!(session.revoked);
        assert!(!session.is_active_at(now));
    }

    #[test]
    fn test_refresh_session_expiration() {
        let now = Utc::now();
        let session = RefreshSession::new(
            Uuid::new_v4(),
            "hash".to_string(),
            ClientMeta::default(),
            now - Duration::days(REFRESH_TOKEN_EXPIRY_DAYS + 1),
            REFRESH_TOKEN_EXPIRY_DAYS,
        );

        assert!(session.is_expired_at(now));
        assert!(!session.is_active_at(now));
    }

    #[test]
    fn test_expiry_fixed_at_creation() {
        let now = Utc::now();
        let session = RefreshSession::new(
            Uuid::new_v4(),
            "hash".to_string(),
            ClientMeta::default(),
            now,
            7,
        );

        // Checking at a later instant does not move the boundary
        assert_eq!(session.expires_at, now + Duration::days(7));
        assert!(session.is_expired_at(now + Duration::days(8)));
    }

    #[test]
    fn test_token_pair_creation() {
        let session_id = Uuid::new_v4();
        let pair = TokenPair::new(
            "access_jwt".to_string(),
            "refresh_secret".to_string(),
            session_id,
            ACCESS_TOKEN_EXPIRY_MINUTES,
        );

        assert_eq!(pair.access_token, "access_jwt");
        assert_eq!(pair.refresh_token, "refresh_secret");
        assert_eq!(pair.session_id, session_id);
        assert_eq!(pair.expires_in, ACCESS_TOKEN_EXPIRY_MINUTES * 60);
    }

    #[test]
    fn test_token_pair_serialization() {
        let pair = TokenPair::new(
            "access".to_string(),
            "refresh".to_string(),
            Uuid::new_v4(),
            15,
        );

        let json = serde_json::to_string(&pair).unwrap();
        let deserialized: TokenPair = serde_json::from_str(&json).unwrap();

        assert_eq!(pair, deserialized);
    }
}
