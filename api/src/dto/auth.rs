use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pw_core::domain::entities::session::{RefreshSession, TokenPair};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Token pair handed to the client after login or rotation.
///
/// `session_id` identifies the backing session explicitly; clients echo it
/// back instead of guessing "current session" from list order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub session_id: Uuid,
    pub expires_in: i64,
}

impl From<TokenPair> for AuthResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            session_id: pair.session_id,
            expires_in: pair.expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutAllResponse {
    /// Number of sessions ended
    pub revoked: usize,
}

/// One active session as shown to its owner. The refresh secret, and even
/// its stored hash, never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<RefreshSession> for SessionInfo {
    fn from(session: RefreshSession) -> Self {
        Self {
            id: session.id,
            ip_address: session.ip_address,
            user_agent: session.user_agent,
            created_at: session.created_at,
            expires_at: session.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pw_core::domain::entities::session::ClientMeta;

    #[test]
    fn test_session_info_hides_secret() {
        let session = RefreshSession::new(
            Uuid::new_v4(),
            "super_secret_hash".to_string(),
            ClientMeta::default(),
            Utc::now(),
            30,
        );

        let info = SessionInfo::from(session);
        let json = serde_json::to_string(&info).unwrap();

        assert!(!json.contains("super_secret_hash"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_auth_response_from_pair() {
        let session_id = Uuid::new_v4();
        let pair = TokenPair::new("a".to_string(), "r".to_string(), session_id, 15);

        let response = AuthResponse::from(pair);

        assert_eq!(response.session_id, session_id);
        assert_eq!(response.expires_in, 15 * 60);
    }

    #[test]
    fn test_session_info_serializes_timestamps() {
        let now = Utc::now();
        let info = SessionInfo {
            id: Uuid::new_v4(),
            ip_address: Some("192.0.2.1".to_string()),
            user_agent: None,
            created_at: now,
            expires_at: now + Duration::days(30),
        };

        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("created_at").is_some());
        assert!(json.get("expires_at").is_some());
    }
}
