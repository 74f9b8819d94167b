//! Security module - credential hashing and verification

mod password;

pub use password::BcryptVerifier;
