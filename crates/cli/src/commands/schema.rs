//! Schema command.

use basket_server::db::CartRepository;
use sqlx::SqlitePool;

use super::CliError;

/// Ensure the carts table exists.
///
/// # Errors
///
/// Returns `CliError::Repository` if the schema statements fail.
pub async fn init(pool: &SqlitePool) -> Result<(), CliError> {
    CartRepository::new(pool).initialize().await?;
    tracing::info!("Cart schema is ready");
    Ok(())
}
