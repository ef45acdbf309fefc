//! Capacity Checker
//!
//! Decides whether one more concurrent occupant fits into a zone over a
//! candidate interval. Overlap counting is exact: concurrency can only
//! change at interval boundaries, so it is enough to count occupants at
//! the sorted distinct boundary points inside the candidate window
//! instead of stepping through every unit of granularity.

use crate::db::repository::{booking, place, RepoResult};
use sqlx::SqliteConnection;

/// Whether a zone can take one more booking over `[start_time, end_time)`.
///
/// Capacity is the count of the zone's active places; zero capacity is
/// treated the same as a full zone. Reads run inside the caller's
/// transaction so the decision is consistent with the rows it will write.
pub async fn capacity_available(
    conn: &mut SqliteConnection,
    zone_id: i64,
    start_time: i64,
    end_time: i64,
) -> RepoResult<bool> {
    let max_capacity = place::count_active_by_zone(&mut *conn, zone_id).await?;
    if max_capacity == 0 {
        return Ok(false);
    }
    let existing =
        booking::active_intervals_in_zone(&mut *conn, zone_id, start_time, end_time).await?;
    Ok(interval_fits(
        max_capacity,
        (start_time, end_time),
        &existing,
    ))
}

/// Sweep-line overlap check, pure over in-memory intervals.
///
/// Counts at each distinct boundary point `t` within the candidate
/// window the intervals containing `t` (`start <= t < end`), plus the
/// candidate itself; any point where the count exceeds `max_capacity`
/// rejects the candidate.
pub fn interval_fits(max_capacity: i64, candidate: (i64, i64), existing: &[(i64, i64)]) -> bool {
    let (start, end) = candidate;

    let mut points: Vec<i64> = Vec::with_capacity(existing.len() * 2 + 2);
    points.push(start);
    points.push(end);
    for &(b_start, b_end) in existing {
        points.push(b_start);
        points.push(b_end);
    }
    points.sort_unstable();
    points.dedup();

    for &t in &points {
        if t < start || t >= end {
            continue;
        }
        let mut occupants: i64 = 1; // the candidate interval contains t
        for &(b_start, b_end) in existing {
            if b_start <= t && t < b_end {
                occupants += 1;
            }
        }
        if occupants > max_capacity {
            return false;
        }
    }
    true
}
