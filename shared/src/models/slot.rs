//! Slot Model

use serde::{Deserialize, Serialize};

/// Slot entity - a concrete half-open `[start_time, end_time)` interval
/// on a place. At most one slot exists per (place, start, end) tuple;
/// `is_available` is false while an active booking references it and is
/// restored when that booking is cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Slot {
    pub id: i64,
    pub place_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub is_available: bool,
}
