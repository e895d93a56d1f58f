//! Cart repository for database operations.
//!
//! The `carts` table is owned exclusively by this repository. Rows are only
//! ever inserted by [`CartRepository::add_item`] and deleted by
//! [`CartRepository::purge_older_than`]. Every operation is a single
//! statement or a single transaction, so concurrent callers need no locking.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use basket_core::{CartEntryId, ProductName, SessionId};

use super::RepositoryError;
use crate::models::CartEntry;

/// Idempotent schema statements, applied in order inside one transaction.
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS carts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id TEXT NOT NULL CHECK (session_id <> ''),
        product_name TEXT NOT NULL,
        last_activity TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_carts_session_id ON carts (session_id, id)",
    "CREATE INDEX IF NOT EXISTS idx_carts_last_activity ON carts (last_activity)",
];

#[derive(sqlx::FromRow)]
struct CartEntryRow {
    id: i64,
    session_id: String,
    product_name: String,
    last_activity: DateTime<Utc>,
}

impl TryFrom<CartEntryRow> for CartEntry {
    type Error = RepositoryError;

    fn try_from(row: CartEntryRow) -> Result<Self, Self::Error> {
        let session_id = SessionId::parse(&row.session_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid session id in database: {e}"))
        })?;
        let product_name = ProductName::parse(&row.product_name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product name in database: {e}"))
        })?;

        Ok(Self {
            id: CartEntryId::new(row.id),
            session_id,
            product_name,
            last_activity: row.last_activity,
        })
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `carts` table and its indexes if they do not exist.
    ///
    /// Safe to call on every process start.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn initialize(&self) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Get the product names in a session's cart, oldest first.
    ///
    /// At most `limit` names are returned. A session without entries yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_items(
        &self,
        session_id: &SessionId,
        limit: u32,
    ) -> Result<Vec<ProductName>, RepositoryError> {
        let entries = self.list_entries(session_id, limit).await?;
        Ok(entries.into_iter().map(|e| e.product_name).collect())
    }

    /// Get the full entries of a session's cart, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn list_entries(
        &self,
        session_id: &SessionId,
        limit: u32,
    ) -> Result<Vec<CartEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartEntryRow>(
            r"
            SELECT id, session_id, product_name, last_activity
            FROM carts
            WHERE session_id = ?
            ORDER BY id
            LIMIT ?
            ",
        )
        .bind(session_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartEntry::try_from).collect()
    }

    /// Append a product to a session's cart, stamped with the current time.
    ///
    /// Never merges with existing entries for the same product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add_item(
        &self,
        session_id: &SessionId,
        product_name: &ProductName,
    ) -> Result<CartEntry, RepositoryError> {
        self.add_item_at(session_id, product_name, Utc::now()).await
    }

    /// Append a product to a session's cart with an explicit activity time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn add_item_at(
        &self,
        session_id: &SessionId,
        product_name: &ProductName,
        last_activity: DateTime<Utc>,
    ) -> Result<CartEntry, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO carts (session_id, product_name, last_activity)
            VALUES (?, ?, ?)
            ",
        )
        .bind(session_id.as_str())
        .bind(product_name.as_str())
        .bind(last_activity)
        .execute(self.pool)
        .await?;

        Ok(CartEntry {
            id: CartEntryId::new(result.last_insert_rowid()),
            session_id: session_id.clone(),
            product_name: product_name.clone(),
            last_activity,
        })
    }

    /// Delete every entry whose last activity is more than `age` ago.
    ///
    /// Returns the number of deleted rows; zero is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn purge_older_than(&self, age: Duration) -> Result<u64, RepositoryError> {
        // An age beyond chrono's range means nothing can be that old
        let cutoff = TimeDelta::from_std(age)
            .ok()
            .and_then(|delta| Utc::now().checked_sub_signed(delta))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        self.purge_before(cutoff).await
    }

    /// Delete every entry whose last activity precedes `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM carts WHERE last_activity < ?")
            .bind(cutoff)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Count all stored entries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_entries(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM carts")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Count the distinct sessions that currently have entries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_sessions(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT session_id) FROM carts")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
