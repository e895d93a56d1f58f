//! CLI command implementations.

pub mod carts;
pub mod schema;

use std::path::PathBuf;

use basket_server::config::{ConfigError, ServerConfig};
use basket_server::db::{self, RepositoryError};
use sqlx::SqlitePool;

/// Errors surfaced by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to open database: {0}")]
    Connect(#[from] sqlx::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Open the database named on the command line or in the environment.
///
/// # Errors
///
/// Returns `CliError` if the environment is invalid or the file cannot be opened.
pub async fn open_pool(database: Option<PathBuf>) -> Result<SqlitePool, CliError> {
    let path = match database {
        Some(path) => path,
        None => ServerConfig::from_env()?.database_path,
    };

    tracing::info!(path = %path.display(), "Opening cart database");
    Ok(db::create_pool(&path).await?)
}
