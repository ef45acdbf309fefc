//! Slot Repository

use super::RepoResult;
use shared::models::Slot;

const COLUMNS: &str = "id, place_id, start_time, end_time, is_available";

pub async fn find_by_id(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
) -> RepoResult<Option<Slot>> {
    let slot = sqlx::query_as::<_, Slot>(&format!("SELECT {COLUMNS} FROM slot WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(slot)
}

/// Slot covering exactly `[start_time, end_time)` on the place, if any
pub async fn find_exact(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    place_id: i64,
    start_time: i64,
    end_time: i64,
) -> RepoResult<Option<Slot>> {
    let slot = sqlx::query_as::<_, Slot>(&format!(
        "SELECT {COLUMNS} FROM slot WHERE place_id = ? AND start_time = ? AND end_time = ?"
    ))
    .bind(place_id)
    .bind(start_time)
    .bind(end_time)
    .fetch_optional(db)
    .await?;
    Ok(slot)
}

/// Slots on the place whose interval overlaps `[start_time, end_time)`
pub async fn find_overlapping(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    place_id: i64,
    start_time: i64,
    end_time: i64,
) -> RepoResult<Vec<Slot>> {
    let slots = sqlx::query_as::<_, Slot>(&format!(
        "SELECT {COLUMNS} FROM slot WHERE place_id = ? AND start_time < ? AND end_time > ?"
    ))
    .bind(place_id)
    .bind(end_time)
    .bind(start_time)
    .fetch_all(db)
    .await?;
    Ok(slots)
}

/// Slots on the place starting within `[day_start, day_end)`
pub async fn find_by_place_and_day(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    place_id: i64,
    day_start: i64,
    day_end: i64,
) -> RepoResult<Vec<Slot>> {
    let slots = sqlx::query_as::<_, Slot>(&format!(
        "SELECT {COLUMNS} FROM slot WHERE place_id = ? AND start_time >= ? AND start_time < ? ORDER BY start_time"
    ))
    .bind(place_id)
    .bind(day_start)
    .bind(day_end)
    .fetch_all(db)
    .await?;
    Ok(slots)
}

/// Reserve a slot: flip `is_available` off, guarded on it still being on.
/// Returns false if another writer took the slot first.
pub async fn reserve(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE slot SET is_available = 0 WHERE id = ? AND is_available = 1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Free a slot after its booking is cancelled or superseded by closure
pub async fn release(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE slot SET is_available = 1 WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// Create a slot for the exact interval, unavailable from creation.
/// The UNIQUE(place_id, start_time, end_time) constraint surfaces a
/// concurrent creation as `RepoError::Duplicate`.
pub async fn create_unavailable(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    place_id: i64,
    start_time: i64,
    end_time: i64,
) -> RepoResult<Slot> {
    let slot = sqlx::query_as::<_, Slot>(&format!(
        "INSERT INTO slot (place_id, start_time, end_time, is_available) VALUES (?, ?, ?, 0) RETURNING {COLUMNS}"
    ))
    .bind(place_id)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(db)
    .await?;
    Ok(slot)
}
