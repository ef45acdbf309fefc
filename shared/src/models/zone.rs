//! Zone Model

use serde::{Deserialize, Serialize};

/// Zone entity - a bookable area whose capacity is the count of its
/// active places.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Zone {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
    /// Why the zone is closed, set by an admin closure
    pub closure_reason: Option<String>,
    /// When the closure lapses; the zone is reactivated once this has passed
    pub closed_until: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create zone payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneCreate {
    pub name: String,
    pub address: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Number of places seeded into the zone (its concurrent capacity)
    #[serde(default)]
    pub places_count: i64,
}

/// Update zone payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

/// Close zone payload - cancels active bookings overlapping the window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneCloseRequest {
    pub reason: String,
    pub from_time: i64,
    pub to_time: i64,
}

/// Zone listing entry with booking rollups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub closure_reason: Option<String>,
    pub closed_until: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Count of bookings currently in `active` status
    pub active_bookings: i64,
    /// Count of bookings in `cancelled` status
    pub cancelled_bookings: i64,
    /// Active bookings whose interval contains the current instant
    pub current_occupancy: i64,
}

/// Per-zone statistics row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneStatistics {
    pub zone_id: i64,
    pub zone_name: String,
    pub is_active: bool,
    pub closure_reason: Option<String>,
    pub closed_until: Option<i64>,
    pub active_bookings: i64,
    pub cancelled_bookings: i64,
    pub current_occupancy: i64,
}

fn default_true() -> bool {
    true
}
