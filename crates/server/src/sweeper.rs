//! Retention sweeper for abandoned carts.
//!
//! A background task on the server's event loop that purges entries inactive
//! for longer than the retention window. The first sweep runs immediately at
//! startup, then once per sweep interval for the life of the process.
//!
//! A failed sweep is logged and reported to Sentry; the next tick runs
//! regardless. The purge is a single transactional `DELETE`, so an overlapping
//! manual purge (`basket purge`) is harmless.

use std::time::Duration;

use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::config::RetentionConfig;
use crate::db::{CartRepository, RepositoryError};

/// Spawn the sweeper on the current runtime.
///
/// The returned handle can be aborted during shutdown.
pub fn spawn_sweeper(pool: SqlitePool, retention: RetentionConfig) -> JoinHandle<()> {
    info!(
        window_secs = retention.window.as_secs(),
        interval_secs = retention.sweep_interval.as_secs(),
        "Spawning retention sweeper"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(retention.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            // Errors are reported inside; the loop never stops on failure
            let _ = sweep_once(&pool, retention.window).await;
        }
    })
}

/// Run one sweep, logging the outcome.
///
/// # Errors
///
/// Returns the storage error after it has been logged.
pub async fn sweep_once(pool: &SqlitePool, window: Duration) -> Result<u64, RepositoryError> {
    match CartRepository::new(pool).purge_older_than(window).await {
        Ok(purged) => {
            info!(purged, "Ran retention sweep for abandoned carts");
            Ok(purged)
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            error!(error = %e, sentry_event_id = %event_id, "Retention sweep failed");
            Err(e)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use basket_core::{ProductName, SessionId};
    use chrono::{TimeDelta, Utc};

    use super::*;
    use crate::db::create_memory_pool;

    const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    fn fast_retention() -> RetentionConfig {
        RetentionConfig {
            window: WEEK,
            sweep_interval: Duration::from_millis(20),
        }
    }

    async fn seed_stale(pool: &SqlitePool) {
        CartRepository::new(pool)
            .add_item_at(
                &SessionId::parse("stale").unwrap(),
                &ProductName::parse("Old").unwrap(),
                Utc::now() - TimeDelta::days(30),
            )
            .await
            .unwrap();
    }

    /// Poll until the table is empty or two seconds pass.
    async fn wait_until_empty(pool: &SqlitePool) -> bool {
        for _ in 0..100 {
            if CartRepository::new(pool).count_entries().await.unwrap_or(-1) == 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_sweep_once_reports_count() {
        let pool = create_memory_pool().await.unwrap();
        CartRepository::new(&pool).initialize().await.unwrap();
        seed_stale(&pool).await;

        assert_eq!(sweep_once(&pool, WEEK).await.unwrap(), 1);
        assert_eq!(sweep_once(&pool, WEEK).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sweep_once_returns_storage_error() {
        // No schema: the DELETE fails
        let pool = create_memory_pool().await.unwrap();
        assert!(sweep_once(&pool, WEEK).await.is_err());
    }

    #[tokio::test]
    async fn test_sweeper_runs_immediately() {
        let pool = create_memory_pool().await.unwrap();
        CartRepository::new(&pool).initialize().await.unwrap();
        seed_stale(&pool).await;

        let retention = RetentionConfig {
            window: WEEK,
            sweep_interval: Duration::from_secs(3600),
        };
        let handle = spawn_sweeper(pool.clone(), retention);

        assert!(wait_until_empty(&pool).await);
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_survives_failed_cycle() {
        let pool = create_memory_pool().await.unwrap();
        let handle = spawn_sweeper(pool.clone(), fast_retention());

        // Let at least one sweep fail against the missing table
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!handle.is_finished());

        CartRepository::new(&pool).initialize().await.unwrap();
        seed_stale(&pool).await;

        assert!(wait_until_empty(&pool).await);
        handle.abort();
    }
}
