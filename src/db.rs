//! Database module
//!
//! Connection pool, migrations and the transactional scope used by writes
//! that must land together.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::str::FromStr;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};

use crate::repository::RepositoryError;

pub type DbPool = SqlitePool;
pub type DbConnection = SqliteConnection;

/// Embedded schema migrations (`migrations/`)
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create the directory of a file-backed database URL if it is missing
pub fn ensure_database_dir(database_url: &str) -> std::io::Result<()> {
    match database_dir(database_url) {
        Some(dir) => std::fs::create_dir_all(dir),
        None => Ok(()),
    }
}

fn database_dir(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

/// Open a connection pool for `database_url`, creating the file if needed
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Single-connection in-memory database. The connection is never recycled,
/// so the schema lives as long as the pool.
pub async fn connect_in_memory() -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Apply pending migrations
pub async fn run_migrations(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Simple connectivity check
pub async fn verify_connection(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &DbPool) -> Result<bool, sqlx::Error> {
    let required_tables = ["companies", "memberships", "transactions"];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}

// =========================================================================
// Transaction scope
// =========================================================================

/// Future returned by a body run inside [`TransactionManager::execute`]
pub type TxFuture<'t, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 't>>;

/// Runs a unit of work inside a database transaction
#[derive(Debug, Clone)]
pub struct TransactionManager {
    pool: DbPool,
}

impl TransactionManager {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction, hand its connection to `operation`, then commit
    /// on `Ok` or roll back on `Err`. The connection goes back to the pool
    /// either way.
    pub async fn execute<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: for<'t> FnOnce(&'t mut DbConnection) -> TxFuture<'t, T, E>,
        E: From<RepositoryError>,
    {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::operation_failed("begin", "Transaction", e))?;

        let outcome = operation(&mut *tx).await;

        match outcome {
            Ok(value) => {
                tx.commit()
                    .await
                    .map_err(|e| RepositoryError::operation_failed("commit", "Transaction", e))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}
