//! Database operations for the cart store.
//!
//! # Database: local SQLite file (`cart_database.db` by default)
//!
//! ## Tables
//!
//! - `carts` - One row per product addition, keyed by anonymous session id
//!
//! # Schema
//!
//! There is no migration mechanism. [`carts::CartRepository::initialize`]
//! issues `CREATE ... IF NOT EXISTS` statements and runs on every start.

pub mod carts;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub use carts::CartRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a SQLite connection pool backed by a file, creating it if missing.
///
/// # Arguments
///
/// * `path` - Location of the database file
///
/// # Errors
///
/// Returns `sqlx::Error` if the file cannot be opened.
pub async fn create_pool(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create an in-memory SQLite pool.
///
/// Every connection to `sqlite::memory:` sees its own private database, so the
/// pool holds exactly one connection and never recycles it.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}
