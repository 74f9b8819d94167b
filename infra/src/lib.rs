//! # Infrastructure Layer
//!
//! Concrete implementations behind the `pw_core` traits:
//! - **Database**: MySQL repositories using SQLx
//! - **Security**: bcrypt-backed credential verification

// Re-export core types for convenience
pub use pw_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Security module - credential hashing and verification
pub mod security;
