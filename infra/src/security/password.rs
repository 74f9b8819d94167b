//! bcrypt-backed credential verification.

use pw_core::errors::DomainError;
use pw_core::services::auth::CredentialVerifier;

/// Verifies passwords against stored bcrypt hashes
#[derive(Clone, Default)]
pub struct BcryptVerifier;

impl BcryptVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Hash a password for storage. Used by account provisioning, not by
    /// the authentication path.
    pub fn hash_password(password: &str) -> Result<String, DomainError> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| DomainError::Internal {
            message: format!("failed to hash password: {e}"),
        })
    }
}

impl CredentialVerifier for BcryptVerifier {
    fn verify(&self, secret: &str, hash: &str) -> bool {
        // A malformed stored hash is a mismatch, not a distinct outcome a
        // caller could observe
        bcrypt::verify(secret, hash).unwrap_or(false)
    }
}
