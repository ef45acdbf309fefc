use super::*;
use crate::utils::time::Clock;
use shared::models::{BookingCreateTimeRange, ZoneCreate};
use tempfile::TempDir;

mod test_close_zone;
mod test_extend;

/// One hour in millis
const HOUR: i64 = 3_600_000;

/// Fixed test epoch: 2025-06-02 00:00:00 UTC
const T0: i64 = 1_748_822_400_000;

/// Calendar date matching [`T0`]
const DATE: &str = "2025-06-02";

/// Millis for `hour:00` on the test date
fn at_hour(hour: i64) -> i64 {
    T0 + hour * HOUR
}

struct TestContext {
    manager: BookingManager,
    // keep the temp database directory alive for the test's duration
    _dir: TempDir,
}

async fn create_test_manager() -> TestContext {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("booking-test.db");
    let db = DbService::new(db_path.to_str().unwrap()).await.unwrap();
    let config = Config::with_overrides(db_path.to_string_lossy(), 12);
    let manager = BookingManager::with_clock(db, config, Clock::fixed(T0));
    TestContext {
        manager,
        _dir: dir,
    }
}

async fn seed_zone(manager: &BookingManager, name: &str, places_count: i64) -> Zone {
    manager
        .create_zone(ZoneCreate {
            name: name.to_string(),
            address: Some("1 Main St".to_string()),
            is_active: true,
            places_count,
        })
        .await
        .unwrap()
}

fn time_range(zone_id: i64, start_hour: u32, end_hour: u32) -> BookingCreateTimeRange {
    BookingCreateTimeRange {
        zone_id,
        date: DATE.to_string(),
        start_hour,
        start_minute: 0,
        end_hour,
        end_minute: 0,
    }
}
