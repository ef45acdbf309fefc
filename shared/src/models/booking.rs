//! Booking Model

use serde::{Deserialize, Serialize};

/// Booking status
///
/// Created only as `Active`; `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

/// Booking entity - a user's reservation of one slot's interval.
///
/// Zone name/address are denormalized at creation so history stays
/// readable even if the zone is later edited or deleted. Times are
/// copied from the slot at creation and never mutated afterwards; an
/// extension creates a new booking for the continuation interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    /// Cleared if the slot row is later removed with its place/zone;
    /// the denormalized fields below keep the record displayable
    pub slot_id: Option<i64>,
    pub status: BookingStatus,
    pub zone_name: Option<String>,
    pub zone_address: Option<String>,
    pub start_time: i64,
    pub end_time: i64,
    pub cancellation_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create booking by time range payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreateTimeRange {
    pub zone_id: i64,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    pub start_hour: u32,
    pub start_minute: u32,
    pub end_hour: u32,
    pub end_minute: u32,
}

/// Booking history filters - all optional, combined with AND
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingHistoryFilters {
    pub status: Option<BookingStatus>,
    pub zone_id: Option<i64>,
    pub date_from: Option<i64>,
    pub date_to: Option<i64>,
}

/// Global booking statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalStatistics {
    pub total_active_bookings: i64,
    pub total_cancelled_bookings: i64,
    /// Distinct users with an active booking containing the current instant
    pub users_in_coworking_now: i64,
}
