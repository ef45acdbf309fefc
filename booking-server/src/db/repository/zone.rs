//! Zone Repository

use super::{RepoError, RepoResult};
use shared::models::{Zone, ZoneCreate, ZoneUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, name, address, is_active, closure_reason, closed_until, created_at, updated_at";

pub async fn find_by_id(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
) -> RepoResult<Option<Zone>> {
    let zone =
        sqlx::query_as::<_, Zone>(&format!("SELECT {COLUMNS} FROM zone WHERE id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await?;
    Ok(zone)
}

pub async fn find_all(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    include_inactive: bool,
) -> RepoResult<Vec<Zone>> {
    let sql = if include_inactive {
        format!("SELECT {COLUMNS} FROM zone ORDER BY name")
    } else {
        format!("SELECT {COLUMNS} FROM zone WHERE is_active = 1 ORDER BY name")
    };
    let zones = sqlx::query_as::<_, Zone>(&sql).fetch_all(db).await?;
    Ok(zones)
}

/// Create a zone and seed `places_count` places in one transaction.
/// The seeded places are the zone's concurrent capacity.
pub async fn create(pool: &SqlitePool, data: ZoneCreate, now: i64) -> RepoResult<Zone> {
    if data.places_count < 0 {
        return Err(RepoError::Validation(format!(
            "places_count cannot be negative: {}",
            data.places_count
        )));
    }

    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO zone (name, address, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.address)
    .bind(data.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for i in 1..=data.places_count {
        sqlx::query("INSERT INTO place (zone_id, name, is_active) VALUES (?, ?, 1)")
            .bind(id)
            .bind(format!("Place {i}"))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create zone".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ZoneUpdate, now: i64) -> RepoResult<Zone> {
    let rows = sqlx::query(
        "UPDATE zone SET name = COALESCE(?1, name), address = COALESCE(?2, address), is_active = COALESCE(?3, is_active), updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.address)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Zone {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Zone {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM zone WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Mark a zone inactive with a closure reason and lapse time
pub async fn set_closed(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
    reason: &str,
    closed_until: i64,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE zone SET is_active = 0, closure_reason = ?, closed_until = ?, updated_at = ? WHERE id = ?",
    )
    .bind(reason)
    .bind(closed_until)
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Zone {id} not found")));
    }
    Ok(())
}

/// Reactivate zones whose closure window has lapsed, clearing the
/// closure reason and lapse time. Returns the number of zones touched.
pub async fn reactivate_expired(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE zone SET is_active = 1, closure_reason = NULL, closed_until = NULL, updated_at = ?1 WHERE is_active = 0 AND closed_until IS NOT NULL AND closed_until <= ?1",
    )
    .bind(now)
    .execute(db)
    .await?;
    Ok(rows.rows_affected())
}
