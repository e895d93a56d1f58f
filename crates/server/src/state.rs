//! Application state shared across handlers and the retention sweeper.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ServerConfig;
use crate::db::{self, CartRepository, RepositoryError};

/// Error opening the application context.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to open database: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("failed to initialize schema: {0}")]
    Schema(#[from] RepositoryError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It owns the process-wide
/// storage pool: open it with [`AppState::connect`] before serving and release
/// it with [`AppState::close`] after shutdown.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: SqlitePool,
}

impl AppState {
    /// Create a new application state around an existing pool.
    #[must_use]
    pub fn new(config: ServerConfig, pool: SqlitePool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Open the configured database file and make sure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns `StartupError` if the file cannot be opened or the schema
    /// cannot be created.
    pub async fn connect(config: ServerConfig) -> Result<Self, StartupError> {
        let pool = db::create_pool(&config.database_path).await?;
        CartRepository::new(&pool).initialize().await?;
        Ok(Self::new(config, pool))
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a cart repository over the shared pool.
    #[must_use]
    pub fn carts(&self) -> CartRepository<'_> {
        CartRepository::new(&self.inner.pool)
    }

    /// Close the storage pool, waiting for checked-out connections.
    pub async fn close(&self) {
        self.inner.pool.close().await;
    }
}
