//! Database connection pool management

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::time::Duration;

use pw_core::errors::DomainError;

/// Create a MySQL connection pool
///
/// # Arguments
/// * `database_url` - MySQL connection string
/// * `max_connections` - Upper bound on pooled connections
///
/// # Returns
/// * `Ok(MySqlPool)` - Connected pool, verified with an initial connection
/// * `Err(DomainError)` - Connection failed
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<MySqlPool, DomainError> {
    tracing::info!("creating database pool with max_connections: {max_connections}");

    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .connect(database_url)
        .await
        .map_err(|e| DomainError::Store {
            message: format!("failed to connect to database: {e}"),
        })
}
