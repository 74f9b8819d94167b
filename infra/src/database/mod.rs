//! Database module - MySQL implementations using SQLx
//!
//! Provides connection pool management and the repository
//! implementations backing the `pw_core` traits.

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::create_pool;
pub use mysql::{MySqlSessionRepository, MySqlUserRepository};
