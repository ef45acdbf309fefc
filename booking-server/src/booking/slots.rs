//! Slot Resolver
//!
//! Find-or-create resolution of a slot for an exact interval on one
//! place, executed inside the caller's write transaction. Two-phase:
//! an exact-interval lookup first, then an overlap scan, so the whole
//! slot set of the place is never locked, while double-allocation stays
//! impossible (the UNIQUE constraint backstops concurrent creation).

use crate::db::repository::{slot, RepoResult};
use shared::models::Slot;
use sqlx::SqliteConnection;

/// Outcome of resolving a slot for `[start_time, end_time)` on a place
#[derive(Debug, Clone)]
pub enum SlotResolution {
    /// A slot now reserved for the caller (existing or freshly created)
    Reserved(Slot),
    /// An exact-interval slot exists but is held by another booking
    Occupied,
    /// No exact slot, but an overlapping busy slot blocks creation
    PartiallyOccupied,
}

pub async fn resolve_slot(
    conn: &mut SqliteConnection,
    place_id: i64,
    start_time: i64,
    end_time: i64,
) -> RepoResult<SlotResolution> {
    // Phase 1: exact interval
    if let Some(existing) = slot::find_exact(&mut *conn, place_id, start_time, end_time).await? {
        if existing.is_available && slot::reserve(&mut *conn, existing.id).await? {
            return Ok(SlotResolution::Reserved(Slot {
                is_available: false,
                ..existing
            }));
        }
        return Ok(SlotResolution::Occupied);
    }

    // Phase 2: overlap scan; any busy overlapping slot means creating
    // this interval would double-book the place
    let overlapping = slot::find_overlapping(&mut *conn, place_id, start_time, end_time).await?;
    if overlapping.iter().any(|s| !s.is_available) {
        return Ok(SlotResolution::PartiallyOccupied);
    }

    let created = slot::create_unavailable(&mut *conn, place_id, start_time, end_time).await?;
    Ok(SlotResolution::Reserved(created))
}
