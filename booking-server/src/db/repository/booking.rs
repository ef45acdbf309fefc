//! Booking Repository

use super::{RepoError, RepoResult};
use shared::models::{Booking, BookingHistoryFilters};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, user_id, slot_id, status, zone_name, zone_address, start_time, end_time, cancellation_reason, created_at, updated_at";

pub async fn find_by_id(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
) -> RepoResult<Option<Booking>> {
    let booking =
        sqlx::query_as::<_, Booking>(&format!("SELECT {COLUMNS} FROM booking WHERE id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await?;
    Ok(booking)
}

/// Insert a new active booking with zone fields denormalized at creation
#[allow(clippy::too_many_arguments)]
pub async fn insert_active(
    conn: &mut SqliteConnection,
    user_id: i64,
    slot_id: i64,
    zone_name: Option<&str>,
    zone_address: Option<&str>,
    start_time: i64,
    end_time: i64,
    now: i64,
) -> RepoResult<Booking> {
    let booking = sqlx::query_as::<_, Booking>(&format!(
        "INSERT INTO booking (user_id, slot_id, status, zone_name, zone_address, start_time, end_time, created_at, updated_at) VALUES (?, ?, 'active', ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    ))
    .bind(user_id)
    .bind(slot_id)
    .bind(zone_name)
    .bind(zone_address)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(booking)
}

/// Whether the user already holds an active booking on this slot
pub async fn exists_active_for_user_on_slot(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    user_id: i64,
    slot_id: i64,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM booking WHERE user_id = ? AND slot_id = ? AND status = 'active'",
    )
    .bind(user_id)
    .bind(slot_id)
    .fetch_one(db)
    .await?;
    Ok(count > 0)
}

/// Whether the user has another active booking overlapping `[start, end)`
pub async fn user_conflict_exists(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    user_id: i64,
    start_time: i64,
    end_time: i64,
    exclude_booking_id: Option<i64>,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM booking WHERE user_id = ?1 AND status = 'active' AND start_time < ?2 AND end_time > ?3 AND (?4 IS NULL OR id != ?4)",
    )
    .bind(user_id)
    .bind(end_time)
    .bind(start_time)
    .bind(exclude_booking_id)
    .fetch_one(db)
    .await?;
    Ok(count > 0)
}

/// Intervals of active bookings in the zone overlapping `[start, end)`,
/// the capacity checker's input
pub async fn active_intervals_in_zone(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    zone_id: i64,
    start_time: i64,
    end_time: i64,
) -> RepoResult<Vec<(i64, i64)>> {
    let intervals = sqlx::query_as::<_, (i64, i64)>(
        "SELECT b.start_time, b.end_time FROM booking b \
         JOIN slot s ON s.id = b.slot_id \
         JOIN place p ON p.id = s.place_id \
         WHERE p.zone_id = ? AND b.status = 'active' AND b.start_time < ? AND b.end_time > ?",
    )
    .bind(zone_id)
    .bind(end_time)
    .bind(start_time)
    .fetch_all(db)
    .await?;
    Ok(intervals)
}

/// Lazily complete every active booking whose end has passed.
/// Returns the number of bookings flipped.
pub async fn complete_expired(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE booking SET status = 'completed', updated_at = ?1 WHERE status = 'active' AND end_time <= ?1",
    )
    .bind(now)
    .execute(db)
    .await?;
    Ok(rows.rows_affected())
}

/// Complete a single expired booking, guarded on it still being active
pub async fn complete_one(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE booking SET status = 'completed', updated_at = ? WHERE id = ? AND status = 'active'",
    )
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Cancel a booking, guarded on it still being active
pub async fn cancel(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
    reason: Option<&str>,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE booking SET status = 'cancelled', cancellation_reason = ?, updated_at = ? WHERE id = ? AND status = 'active'",
    )
    .bind(reason)
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Booking {id} not found or not active"
        )));
    }
    Ok(())
}

/// Active bookings in the zone whose slot interval overlaps the closure
/// window `[from_time, to_time)`
pub async fn find_active_overlapping_closure(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    zone_id: i64,
    from_time: i64,
    to_time: i64,
) -> RepoResult<Vec<Booking>> {
    let bookings = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {} FROM booking b \
         JOIN slot s ON s.id = b.slot_id \
         JOIN place p ON p.id = s.place_id \
         WHERE p.zone_id = ? AND b.status = 'active' AND s.start_time < ? AND s.end_time > ?",
        qualified_columns("b")
    ))
    .bind(zone_id)
    .bind(to_time)
    .bind(from_time)
    .fetch_all(db)
    .await?;
    Ok(bookings)
}

/// A user's booking history, newest first, with optional filters
pub async fn find_history(
    pool: &SqlitePool,
    user_id: i64,
    filters: &BookingHistoryFilters,
) -> RepoResult<Vec<Booking>> {
    let mut sql = format!(
        "SELECT {} FROM booking b \
         JOIN slot s ON s.id = b.slot_id \
         JOIN place p ON p.id = s.place_id \
         JOIN zone z ON z.id = p.zone_id \
         WHERE b.user_id = ?",
        qualified_columns("b")
    );
    if filters.status.is_some() {
        sql.push_str(" AND b.status = ?");
    }
    if filters.zone_id.is_some() {
        sql.push_str(" AND z.id = ?");
    }
    if filters.date_from.is_some() {
        sql.push_str(" AND s.start_time >= ?");
    }
    if filters.date_to.is_some() {
        sql.push_str(" AND s.start_time <= ?");
    }
    sql.push_str(" ORDER BY b.created_at DESC");

    let mut query = sqlx::query_as::<_, Booking>(&sql).bind(user_id);
    if let Some(status) = filters.status {
        query = query.bind(status.as_str());
    }
    if let Some(zone_id) = filters.zone_id {
        query = query.bind(zone_id);
    }
    if let Some(date_from) = filters.date_from {
        query = query.bind(date_from);
    }
    if let Some(date_to) = filters.date_to {
        query = query.bind(date_to);
    }

    let bookings = query.fetch_all(pool).await?;
    Ok(bookings)
}

fn qualified_columns(alias: &str) -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}
