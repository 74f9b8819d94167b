//! Pure token issuance: JWT minting/verification and refresh secret generation.
//!
//! Nothing here touches the session store; everything is deterministic given
//! the config, the clock value the caller captured, and the RNG.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::session::{Claims, TokenKind, JWT_ISSUER};
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Refresh secret entropy in bytes (256 bits)
const REFRESH_SECRET_BYTES: usize = 32;

/// Mints and verifies access tokens and generates refresh secrets
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_expiry_minutes: i64,
}

impl TokenIssuer {
    /// Creates an issuer signing with HS256 from the configured secret
    pub fn new(config: &TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            encoding_key,
            decoding_key,
            validation,
            access_token_expiry_minutes: config.access_token_expiry_minutes,
        }
    }

    /// Mints a signed access token for a user
    ///
    /// # Arguments
    ///
    /// * `user_id` - The authenticated subject
    /// * `now` - Wall-clock instant captured by the caller; issuance and
    ///   expiry both derive from it
    pub fn issue_access_token(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        let claims = Claims::new_access_token(user_id, now, self.access_token_expiry_minutes);
        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies an access token and returns its claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Signature, expiry, and kind all check out
    /// * `Err(DomainError)` - Invalid signature/format, expired, not yet
    ///   valid, or a non-access token presented as one
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        DomainError::Token(TokenError::TokenExpired)
                    }
                    jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                        DomainError::Token(TokenError::TokenNotYetValid)
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        DomainError::Token(TokenError::InvalidSignature)
                    }
                    _ => DomainError::Token(TokenError::InvalidTokenFormat),
                }
            })?;

        if token_data.claims.kind != TokenKind::Access {
            return Err(DomainError::Token(TokenError::WrongTokenKind));
        }

        Ok(token_data.claims)
    }

    /// Generates a fresh refresh secret.
    ///
    /// # Returns
    ///
    /// `(raw, hash)` - the hex-encoded 256-bit secret handed to the client,
    /// and the SHA-256 hash that is the only form ever persisted
    pub fn generate_secret(&self) -> (String, String) {
        let mut bytes = [0u8; REFRESH_SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let raw = hex::encode(bytes);
        let hash = Self::hash_secret(&raw);
        (raw, hash)
    }

    /// Hashes a refresh secret for storage and lookup
    pub fn hash_secret(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
