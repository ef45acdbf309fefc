use super::*;
use shared::models::ZoneCloseRequest;

#[tokio::test]
async fn test_close_zone_cancels_overlapping_window_only() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 2).await;

    let morning = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone.id, 10, 12))
        .await
        .unwrap();
    let evening = ctx
        .manager
        .create_booking_by_time_range(2, &time_range(zone.id, 18, 20))
        .await
        .unwrap();

    // close 09:00-17:00
    let affected = ctx
        .manager
        .close_zone(
            zone.id,
            &ZoneCloseRequest {
                reason: "maintenance".to_string(),
                from_time: at_hour(9),
                to_time: at_hour(17),
            },
        )
        .await
        .unwrap();

    assert_eq!(affected.len(), 1);
    assert_eq!(affected[0].id, morning.id);
    assert_eq!(affected[0].status, BookingStatus::Cancelled);
    assert_eq!(
        affected[0].cancellation_reason.as_deref(),
        Some("Zone closed: maintenance")
    );

    // the booking outside the window is untouched
    let evening = ctx.manager.get_booking(evening.id).await.unwrap().unwrap();
    assert_eq!(evening.status, BookingStatus::Active);

    // the cancelled booking's slot was freed
    let places = ctx.manager.list_places(zone.id).await.unwrap();
    let slots = ctx.manager.list_slots(places[0].id, DATE).await.unwrap();
    let freed = slots
        .iter()
        .find(|s| Some(s.id) == morning.slot_id)
        .expect("slot still listed");
    assert!(freed.is_available);

    // the zone itself is now inactive with the closure recorded
    let zones = ctx.manager.list_zones(true).await.unwrap();
    let closed = zones.iter().find(|z| z.id == zone.id).unwrap();
    assert!(!closed.is_active);
    assert_eq!(closed.closure_reason.as_deref(), Some("maintenance"));
    assert_eq!(closed.closed_until, Some(at_hour(17)));
}

#[tokio::test]
async fn test_close_zone_emits_event_per_booking() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 2).await;

    ctx.manager
        .create_booking_by_time_range(1, &time_range(zone.id, 10, 12))
        .await
        .unwrap();
    ctx.manager
        .create_booking_by_time_range(2, &time_range(zone.id, 11, 13))
        .await
        .unwrap();

    let mut rx = ctx.manager.subscribe();
    let affected = ctx
        .manager
        .close_zone(
            zone.id,
            &ZoneCloseRequest {
                reason: "flooding".to_string(),
                from_time: at_hour(9),
                to_time: at_hour(17),
            },
        )
        .await
        .unwrap();
    assert_eq!(affected.len(), 2);

    for _ in 0..2 {
        let event = rx.try_recv().unwrap();
        assert_eq!(event.event_type, shared::BookingEventType::ZoneClosed);
    }
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_close_unknown_zone_is_noop() {
    let ctx = create_test_manager().await;
    let affected = ctx
        .manager
        .close_zone(
            9999,
            &ZoneCloseRequest {
                reason: "maintenance".to_string(),
                from_time: at_hour(9),
                to_time: at_hour(17),
            },
        )
        .await
        .unwrap();
    assert!(affected.is_empty());
}

#[tokio::test]
async fn test_listing_reactivates_lapsed_closure() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 1).await;

    ctx.manager
        .close_zone(
            zone.id,
            &ZoneCloseRequest {
                reason: "maintenance".to_string(),
                from_time: at_hour(9),
                to_time: at_hour(17),
            },
        )
        .await
        .unwrap();

    // before the closure lapses the zone stays hidden from active listings
    let zones = ctx.manager.list_zones(false).await.unwrap();
    assert!(zones.iter().all(|z| z.id != zone.id));

    // past closed_until the listing sweep reactivates it
    ctx.manager.clock().advance(18 * HOUR);
    let zones = ctx.manager.list_zones(false).await.unwrap();
    let reopened = zones.iter().find(|z| z.id == zone.id).unwrap();
    assert!(reopened.is_active);
    assert!(reopened.closure_reason.is_none());
    assert!(reopened.closed_until.is_none());
}
