//! Periodic reaper for expired and stale revoked sessions.
//!
//! Keeps storage bounded; correctness of the token lifecycle never depends
//! on a sweep having run. The sweep stays off the request path, and a failed
//! cycle is logged and retried on the next tick.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::SessionRepository;

/// Configuration for the session cleanup service
#[derive(Debug, Clone)]
pub struct SessionCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for SessionCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 24 * 60 * 60, // daily
            enabled: true,
        }
    }
}

/// Service for purging sessions the lifecycle no longer needs
pub struct SessionCleanupService<R: SessionRepository + 'static> {
    repository: Arc<R>,
    config: SessionCleanupConfig,
}

impl<R: SessionRepository> SessionCleanupService<R> {
    /// Create a new session cleanup service
    pub fn new(repository: Arc<R>, config: SessionCleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of the sweep
    /// * `Err(DomainError)` - The sweep failed; the next cycle retries
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let deleted = self
            .repository
            .delete_expired_or_revoked(Utc::now())
            .await?;

        info!("session cleanup deleted {} rows", deleted);
        Ok(CleanupResult {
            sessions_deleted: deleted,
        })
    }

    /// Start the cleanup service as a background task
    ///
    /// Spawns a tokio task running cleanup at the configured interval.
    /// Errors never abort the loop or the service.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("session cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                "session cleanup service started, running every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup is not a sweep
            interval_timer.tick().await;

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!("session cleanup cycle failed: {e}");
                }
            }
        });
    }
}

/// Result of a cleanup cycle
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of session rows deleted
    pub sessions_deleted: usize,
}
