//! Credential verification capability.

/// Opaque credential check: does this secret match this stored hash?
///
/// The hashing scheme is an infrastructure concern; the domain only ever
/// sees a yes/no answer. Implementations must treat malformed stored hashes
/// as a mismatch, not as a distinct error a caller could observe.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, secret: &str, hash: &str) -> bool;
}
