use super::*;

#[tokio::test]
async fn test_extend_creates_continuation_booking() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 1).await;

    let original = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone.id, 10, 12))
        .await
        .unwrap();

    let continuation = ctx
        .manager
        .extend_booking(1, original.id, 1, 30)
        .await
        .unwrap();

    // a new booking covers exactly the continuation interval
    assert_ne!(continuation.id, original.id);
    assert_eq!(continuation.start_time, original.end_time);
    assert_eq!(continuation.end_time, original.end_time + HOUR + 30 * 60_000);
    assert_eq!(continuation.status, BookingStatus::Active);

    // the original record is untouched
    let reread = ctx
        .manager
        .get_booking(original.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reread.end_time, original.end_time);
    assert_eq!(reread.status, BookingStatus::Active);
}

#[tokio::test]
async fn test_extend_reuses_freed_exact_slot() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 1).await;

    // user 2 held 12-13 and freed it again
    let released = ctx
        .manager
        .create_booking_by_time_range(2, &time_range(zone.id, 12, 13))
        .await
        .unwrap();
    ctx.manager
        .cancel_booking(2, released.id, false)
        .await
        .unwrap();

    let original = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone.id, 10, 12))
        .await
        .unwrap();
    let continuation = ctx
        .manager
        .extend_booking(1, original.id, 1, 0)
        .await
        .unwrap();

    // the freed 12-13 slot was reused, not duplicated
    assert_eq!(continuation.slot_id, released.slot_id);
}

#[tokio::test]
async fn test_extend_expired_booking_completes_it() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 1).await;

    let booking = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone.id, 10, 12))
        .await
        .unwrap();

    // move past the booking's end
    ctx.manager.clock().advance(13 * HOUR);

    let err = ctx
        .manager
        .extend_booking(1, booking.id, 1, 0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "booking_expired");

    // lazy expiry flipped the stale row as a side effect
    let reread = ctx.manager.get_booking(booking.id).await.unwrap().unwrap();
    assert_eq!(reread.status, BookingStatus::Completed);
}

#[tokio::test]
async fn test_extend_not_found_and_permissions() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 1).await;

    let err = ctx.manager.extend_booking(1, 9999, 1, 0).await.unwrap_err();
    assert_eq!(err.code(), "booking_not_found");

    let booking = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone.id, 10, 12))
        .await
        .unwrap();
    // only the owner may extend, admins included out
    let err = ctx
        .manager
        .extend_booking(2, booking.id, 1, 0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "permission_denied");
}

#[tokio::test]
async fn test_extend_cancelled_booking() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 1).await;

    let booking = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone.id, 10, 12))
        .await
        .unwrap();
    ctx.manager
        .cancel_booking(1, booking.id, false)
        .await
        .unwrap();

    let err = ctx
        .manager
        .extend_booking(1, booking.id, 1, 0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "invalid_status");
}

#[tokio::test]
async fn test_extend_max_duration() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 1).await;

    // 10 hours booked, 3 more would exceed the 12-hour cap
    let booking = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone.id, 8, 18))
        .await
        .unwrap();
    let err = ctx
        .manager
        .extend_booking(1, booking.id, 3, 0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "max_duration_exceeded");

    // 2 more is exactly at the cap and passes
    ctx.manager
        .extend_booking(1, booking.id, 2, 0)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_extend_user_time_conflict() {
    let ctx = create_test_manager().await;
    let zone_a = seed_zone(&ctx.manager, "Hall A", 1).await;
    let zone_b = seed_zone(&ctx.manager, "Hall B", 1).await;

    let booking = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone_a.id, 10, 12))
        .await
        .unwrap();
    // the same user already sits in another zone right after
    ctx.manager
        .create_booking_by_time_range(1, &time_range(zone_b.id, 12, 13))
        .await
        .unwrap();

    let err = ctx
        .manager
        .extend_booking(1, booking.id, 1, 0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "user_time_conflict");
}

#[tokio::test]
async fn test_extend_zone_capacity() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 1).await;

    let booking = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone.id, 10, 12))
        .await
        .unwrap();
    // user 2 holds the only place over 12-13
    ctx.manager
        .create_booking_by_time_range(2, &time_range(zone.id, 12, 13))
        .await
        .unwrap();

    let err = ctx
        .manager
        .extend_booking(1, booking.id, 1, 0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "zone_capacity_exceeded");
}

#[tokio::test]
async fn test_extend_slot_unavailable() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 2).await;

    let booking = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone.id, 10, 12))
        .await
        .unwrap();
    // user 2's 12-13 lands on the same first place (no overlap with 10-12)
    ctx.manager
        .create_booking_by_time_range(2, &time_range(zone.id, 12, 13))
        .await
        .unwrap();

    let err = ctx
        .manager
        .extend_booking(1, booking.id, 1, 0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "slot_unavailable");
}

#[tokio::test]
async fn test_extend_slot_partially_occupied() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 2).await;

    let booking = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone.id, 10, 12))
        .await
        .unwrap();
    // user 2's 12-14 also lands on the first place and straddles 12-13
    ctx.manager
        .create_booking_by_time_range(2, &time_range(zone.id, 12, 14))
        .await
        .unwrap();

    let err = ctx
        .manager
        .extend_booking(1, booking.id, 1, 0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "slot_partially_occupied");
}

#[tokio::test]
async fn test_extend_emits_event() {
    let ctx = create_test_manager().await;
    let zone = seed_zone(&ctx.manager, "Main Hall", 1).await;
    let booking = ctx
        .manager
        .create_booking_by_time_range(1, &time_range(zone.id, 10, 12))
        .await
        .unwrap();

    let mut rx = ctx.manager.subscribe();
    let continuation = ctx
        .manager
        .extend_booking(1, booking.id, 1, 0)
        .await
        .unwrap();

    let event = rx.try_recv().unwrap();
    assert_eq!(event.event_type, shared::BookingEventType::BookingExtended);
    match event.payload {
        shared::booking::EventPayload::BookingExtended {
            booking_id,
            end_time,
            ..
        } => {
            assert_eq!(booking_id, continuation.id);
            assert_eq!(end_time, continuation.end_time);
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}
