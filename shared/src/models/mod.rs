//! Data models
//!
//! Shared between the booking engine and its external collaborators
//! (gateway, notifier). DB row types use
//! `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps are
//! `i64` Unix milliseconds (UTC).

pub mod booking;
pub mod place;
pub mod slot;
pub mod zone;

// Re-exports
pub use booking::*;
pub use place::*;
pub use slot::*;
pub use zone::*;
