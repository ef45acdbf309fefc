//! Statistics Aggregator
//!
//! Read-only rollups derived from bookings. Callers run the
//! auto-complete sweep first; snapshots here take no exclusive locks
//! and are approximate under concurrent writes.

use crate::db::repository::{stats, zone, RepoResult};
use sqlx::SqlitePool;
use shared::models::{GlobalStatistics, ZoneStatistics};
use std::collections::HashMap;

pub async fn global_statistics(pool: &SqlitePool, now: i64) -> RepoResult<GlobalStatistics> {
    let (total_active, total_cancelled) = stats::global_counts(pool).await?;
    let users_now = stats::users_present_now(pool, now).await?;
    Ok(GlobalStatistics {
        total_active_bookings: total_active,
        total_cancelled_bookings: total_cancelled,
        users_in_coworking_now: users_now,
    })
}

pub async fn zone_statistics(pool: &SqlitePool, now: i64) -> RepoResult<Vec<ZoneStatistics>> {
    let zones = zone::find_all(pool, true).await?;
    let rollups: HashMap<i64, stats::ZoneRollup> = stats::zone_rollups(pool, now)
        .await?
        .into_iter()
        .map(|r| (r.zone_id, r))
        .collect();

    Ok(zones
        .into_iter()
        .map(|z| {
            let rollup = rollups.get(&z.id);
            ZoneStatistics {
                zone_id: z.id,
                zone_name: z.name,
                is_active: z.is_active,
                closure_reason: z.closure_reason,
                closed_until: z.closed_until,
                active_bookings: rollup.map_or(0, |r| r.active_bookings),
                cancelled_bookings: rollup.map_or(0, |r| r.cancelled_bookings),
                current_occupancy: rollup.map_or(0, |r| r.current_occupancy),
            }
        })
        .collect())
}
