//! Cart maintenance commands.

use std::time::Duration;

use basket_core::SessionId;
use basket_server::db::CartRepository;
use sqlx::SqlitePool;

use super::CliError;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Run one retention sweep by hand.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for a zero-day window, or
/// `CliError::Repository` if the delete fails.
pub async fn purge(pool: &SqlitePool, older_than_days: u32) -> Result<(), CliError> {
    if older_than_days == 0 {
        return Err(CliError::InvalidArgument(
            "--older-than-days must be at least 1".to_string(),
        ));
    }

    let window = Duration::from_secs(u64::from(older_than_days) * SECONDS_PER_DAY);
    let purged = CartRepository::new(pool).purge_older_than(window).await?;
    tracing::info!(purged, older_than_days, "Purged abandoned cart entries");
    Ok(())
}

/// Log the entries of one session's cart.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for a malformed session id, or
/// `CliError::Repository` if the query fails.
pub async fn list(pool: &SqlitePool, session_id: &str, limit: u32) -> Result<(), CliError> {
    let session_id =
        SessionId::parse(session_id).map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    let entries = CartRepository::new(pool)
        .list_entries(&session_id, limit)
        .await?;

    if entries.is_empty() {
        tracing::info!(session_id = %session_id, "Cart is empty");
    }
    for entry in entries {
        tracing::info!(
            id = %entry.id,
            product = %entry.product_name,
            last_activity = %entry.last_activity.to_rfc3339(),
            "Cart entry"
        );
    }
    Ok(())
}

/// Log table statistics.
///
/// # Errors
///
/// Returns `CliError::Repository` if a count query fails.
pub async fn stats(pool: &SqlitePool) -> Result<(), CliError> {
    let repo = CartRepository::new(pool);
    let entries = repo.count_entries().await?;
    let sessions = repo.count_sessions().await?;
    tracing::info!(entries, sessions, "Cart table statistics");
    Ok(())
}
