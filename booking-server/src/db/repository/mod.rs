//! Repository Module
//!
//! CRUD and query operations over the SQLite tables. Functions that
//! participate in a caller's transaction take `&mut SqliteConnection`;
//! standalone reads take `&SqlitePool`.

pub mod booking;
pub mod place;
pub mod slot;
pub mod stats;
pub mod zone;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        // Unique-constraint violations surface as Duplicate so write
        // operations can translate a lost race into a domain outcome
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
