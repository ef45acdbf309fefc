//! Place Repository

use super::RepoResult;
use shared::models::Place;

pub async fn find_by_id(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
) -> RepoResult<Option<Place>> {
    let place =
        sqlx::query_as::<_, Place>("SELECT id, zone_id, name, is_active FROM place WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?;
    Ok(place)
}

/// Active places of a zone in stable name order, the order in which
/// the allocator tries them
pub async fn find_active_by_zone(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    zone_id: i64,
) -> RepoResult<Vec<Place>> {
    let places = sqlx::query_as::<_, Place>(
        "SELECT id, zone_id, name, is_active FROM place WHERE zone_id = ? AND is_active = 1 ORDER BY name",
    )
    .bind(zone_id)
    .fetch_all(db)
    .await?;
    Ok(places)
}

/// Zone capacity = count of its active places
pub async fn count_active_by_zone(
    db: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    zone_id: i64,
) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM place WHERE zone_id = ? AND is_active = 1")
            .bind(zone_id)
            .fetch_one(db)
            .await?;
    Ok(count)
}
