//! Statistics Repository
//!
//! Read-only rollups over bookings. Snapshots are taken without
//! exclusive locks; the auto-complete sweep runs first on the caller's
//! side so stale `active` rows never leak into the numbers.

use super::RepoResult;

/// Per-zone booking rollup
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ZoneRollup {
    pub zone_id: i64,
    pub active_bookings: i64,
    pub cancelled_bookings: i64,
    pub current_occupancy: i64,
}

/// Booking rollups for every zone: active/cancelled counts and how many
/// active bookings contain the instant `now`
pub async fn zone_rollups(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    now: i64,
) -> RepoResult<Vec<ZoneRollup>> {
    let rollups = sqlx::query_as::<_, ZoneRollup>(
        "SELECT z.id AS zone_id, \
            COUNT(CASE WHEN b.status = 'active' THEN 1 END) AS active_bookings, \
            COUNT(CASE WHEN b.status = 'cancelled' THEN 1 END) AS cancelled_bookings, \
            COUNT(CASE WHEN b.status = 'active' AND b.start_time <= ?1 AND b.end_time > ?1 THEN 1 END) AS current_occupancy \
         FROM zone z \
         LEFT JOIN place p ON p.zone_id = z.id \
         LEFT JOIN slot s ON s.place_id = p.id \
         LEFT JOIN booking b ON b.slot_id = s.id \
         GROUP BY z.id",
    )
    .bind(now)
    .fetch_all(db)
    .await?;
    Ok(rollups)
}

/// Global (active, cancelled) booking counts
pub async fn global_counts(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
) -> RepoResult<(i64, i64)> {
    let counts = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(CASE WHEN status = 'active' THEN 1 END), \
                COUNT(CASE WHEN status = 'cancelled' THEN 1 END) \
         FROM booking",
    )
    .fetch_one(db)
    .await?;
    Ok(counts)
}

/// Distinct users with an active booking containing the instant `now`
pub async fn users_present_now(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    now: i64,
) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT user_id) FROM booking WHERE status = 'active' AND start_time <= ?1 AND end_time > ?1",
    )
    .bind(now)
    .fetch_one(db)
    .await?;
    Ok(count)
}
