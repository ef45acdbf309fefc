//! Database Module
//!
//! Handles SQLite connection pools and migrations

pub mod repository;

use repository::{RepoError, RepoResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database service — owns the SQLite connection pools
///
/// Reads go through `pool`; every mutating transaction goes through
/// `write_pool`, which holds a single connection so concurrent writers
/// serialize at the storage layer. Losers of a race re-read the row
/// inside their own transaction and observe the committed change.
#[derive(Clone)]
pub struct DbService {
    /// Read pool (snapshot reads, statistics, listings)
    pub pool: SqlitePool,
    /// Single-connection pool for mutating transactions
    pub write_pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode and separate read/write pools
    pub async fn new(db_path: &str) -> RepoResult<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| RepoError::Database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let write_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await
            .map_err(|e| RepoError::Database(format!("Failed to open database: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| RepoError::Database(format!("Failed to open database: {e}")))?;

        // busy_timeout: 写冲突时等待 5s 而非立即失败
        for p in [&write_pool, &pool] {
            sqlx::query("PRAGMA busy_timeout = 5000;")
                .execute(p)
                .await
                .map_err(|e| RepoError::Database(format!("Failed to set busy_timeout: {e}")))?;
        }

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        // Run migrations (ignore previously applied but now removed migrations)
        sqlx::migrate!("./migrations")
            .set_ignore_missing(true)
            .run(&write_pool)
            .await
            .map_err(|e| RepoError::Database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool, write_pool })
    }
}
