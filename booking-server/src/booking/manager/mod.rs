//! BookingManager - lifecycle orchestration and the public operation surface
//!
//! This module handles:
//! - Booking creation (fixed slot and by time range)
//! - Cancellation, extension, lazy auto-completion
//! - Zone closure and reactivation effects
//! - Event broadcasting (after commit, fire-and-forget)
//!
//! # Operation Flow
//!
//! ```text
//! create / cancel / extend / close
//!     ├─ 1. Begin write transaction (single-writer pool)
//!     ├─ 2. Re-read the target row inside the transaction
//!     ├─ 3. Business-rule checks (ownership, status, conflicts, capacity)
//!     ├─ 4. Guarded writes (CAS on availability/status)
//!     ├─ 5. Commit
//!     └─ 6. Emit event(s)
//! ```
//!
//! Writers racing for the same slot or booking serialize at the write
//! pool; the loser re-reads the row and observes the committed change,
//! or hits the slot uniqueness constraint at insert. Both outcomes map
//! to a failure result, never an automatic retry.

mod error;
pub use error::*;

#[cfg(test)]
mod tests;

use crate::booking::capacity;
use crate::booking::slots::{self, SlotResolution};
use crate::booking::stats;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    RepoError, RepoResult, booking, place, slot, stats as stats_repo, zone,
};
use crate::utils::time::{self, Clock};
use shared::booking::{BookingEvent, BookingEventType, EventPayload};
use shared::models::{
    Booking, BookingCreateTimeRange, BookingHistoryFilters, BookingStatus, GlobalStatistics,
    Place, Slot, Zone, ZoneCloseRequest, ZoneCreate, ZoneStatistics, ZoneSummary, ZoneUpdate,
};
use std::collections::HashMap;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// BookingManager - the engine's operation surface
///
/// Holds the database service, configuration, the injected clock and
/// the event channel. Cheap to clone; all state lives in the store.
#[derive(Clone)]
pub struct BookingManager {
    db: DbService,
    config: Config,
    clock: Clock,
    event_tx: broadcast::Sender<BookingEvent>,
}

impl std::fmt::Debug for BookingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingManager")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish()
    }
}

impl BookingManager {
    pub fn new(db: DbService, config: Config) -> Self {
        Self::with_clock(db, config, Clock::system())
    }

    /// Create a manager with an explicit clock (fixed in tests)
    pub fn with_clock(db: DbService, config: Config, clock: Clock) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            db,
            config,
            clock,
            event_tx,
        }
    }

    /// Subscribe to domain events (consumed by the notifier)
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.event_tx.subscribe()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    fn emit(&self, event_type: BookingEventType, payload: EventPayload) {
        let event = BookingEvent::new(self.clock.now_millis(), event_type, payload);
        // fire-and-forget: nobody listening is fine
        let _ = self.event_tx.send(event);
    }

    // ========================================================================
    // Booking lifecycle
    // ========================================================================

    /// Book a specific slot for a user.
    ///
    /// Silent-failure operation: returns `Ok(None)` on any rule
    /// violation (slot missing or taken, duplicate booking, user
    /// conflict, capacity full) including a lost concurrent race.
    /// Unexpected storage failures propagate.
    pub async fn create_booking(&self, user_id: i64, slot_id: i64) -> RepoResult<Option<Booking>> {
        match self.try_create_booking(user_id, slot_id).await {
            // the slot was taken by a concurrent request
            Err(RepoError::Duplicate(_)) => Ok(None),
            other => other,
        }
    }

    async fn try_create_booking(&self, user_id: i64, slot_id: i64) -> RepoResult<Option<Booking>> {
        let now = self.clock.now_millis();
        let mut tx = self.db.write_pool.begin().await?;

        let Some(target) = slot::find_by_id(&mut *tx, slot_id).await? else {
            return Ok(None);
        };
        if !target.is_available {
            return Ok(None);
        }

        // place and zone are read for business rules only, never locked
        let owner_place = place::find_by_id(&mut *tx, target.place_id).await?;
        let owner_zone = match &owner_place {
            Some(p) => zone::find_by_id(&mut *tx, p.zone_id).await?,
            None => None,
        };

        if booking::exists_active_for_user_on_slot(&mut *tx, user_id, target.id).await? {
            return Ok(None);
        }
        if booking::user_conflict_exists(
            &mut *tx,
            user_id,
            target.start_time,
            target.end_time,
            None,
        )
        .await?
        {
            return Ok(None);
        }
        if let Some(z) = &owner_zone
            && !capacity::capacity_available(&mut tx, z.id, target.start_time, target.end_time)
                .await?
        {
            return Ok(None);
        }

        if !slot::reserve(&mut *tx, target.id).await? {
            return Ok(None);
        }
        let created = booking::insert_active(
            &mut tx,
            user_id,
            target.id,
            owner_zone.as_ref().map(|z| z.name.as_str()),
            owner_zone.as_ref().and_then(|z| z.address.as_deref()),
            target.start_time,
            target.end_time,
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(booking_id = created.id, user_id, slot_id, "Booking created");
        self.emit(
            BookingEventType::BookingCreated,
            EventPayload::BookingCreated {
                booking_id: created.id,
                user_id: created.user_id,
                zone_name: created.zone_name.clone(),
                start_time: created.start_time,
                end_time: created.end_time,
            },
        );
        Ok(Some(created))
    }

    /// Book any free place in a zone over a calendar date + wall-clock range.
    ///
    /// Coded-failure operation; validation order is fixed and
    /// short-circuiting, see [`CreateBookingError`].
    pub async fn create_booking_by_time_range(
        &self,
        user_id: i64,
        req: &BookingCreateTimeRange,
    ) -> Result<Booking, CreateBookingError> {
        match self.try_create_by_time_range(user_id, req).await {
            // a concurrent writer created the same slot first; surfaced
            // as "no available places", never retried automatically
            Err(CreateBookingError::Storage(RepoError::Duplicate(_))) => {
                Err(CreateBookingError::NoAvailablePlacesConflict)
            }
            other => other,
        }
    }

    async fn try_create_by_time_range(
        &self,
        user_id: i64,
        req: &BookingCreateTimeRange,
    ) -> Result<Booking, CreateBookingError> {
        let date = time::parse_date(&req.date).map_err(|_| CreateBookingError::InvalidDate)?;
        let tz = self.config.business_timezone;
        let start_time = time::date_hm_to_millis(date, req.start_hour, req.start_minute, tz)
            .ok_or(CreateBookingError::InvalidTimeRange)?;
        let end_time = time::date_hm_to_millis(date, req.end_hour, req.end_minute, tz)
            .ok_or(CreateBookingError::InvalidTimeRange)?;
        if end_time <= start_time {
            return Err(CreateBookingError::InvalidTimeRange);
        }
        let max_hours = self.config.max_booking_hours;
        if end_time - start_time > max_hours * 3_600_000 {
            return Err(CreateBookingError::TimeLimitExceeded { max_hours });
        }

        let now = self.clock.now_millis();
        let mut tx = self.db.write_pool.begin().await.map_err(RepoError::from)?;

        let target_zone = match zone::find_by_id(&mut *tx, req.zone_id).await? {
            Some(z) if z.is_active => z,
            _ => return Err(CreateBookingError::ZoneInactive),
        };
        if booking::user_conflict_exists(&mut *tx, user_id, start_time, end_time, None).await? {
            return Err(CreateBookingError::UserConflict);
        }
        if !capacity::capacity_available(&mut tx, target_zone.id, start_time, end_time).await? {
            return Err(CreateBookingError::ZoneCapacityExceeded);
        }
        let places = place::find_active_by_zone(&mut *tx, target_zone.id).await?;
        if places.is_empty() {
            return Err(CreateBookingError::NoAvailablePlaces);
        }

        // Try each active place in stable order; the first place that
        // yields a reservable slot wins
        for candidate in &places {
            let reserved = match slots::resolve_slot(&mut tx, candidate.id, start_time, end_time)
                .await?
            {
                SlotResolution::Reserved(s) => s,
                SlotResolution::Occupied | SlotResolution::PartiallyOccupied => continue,
            };
            let created = booking::insert_active(
                &mut tx,
                user_id,
                reserved.id,
                Some(target_zone.name.as_str()),
                target_zone.address.as_deref(),
                start_time,
                end_time,
                now,
            )
            .await?;
            tx.commit().await.map_err(RepoError::from)?;

            tracing::info!(
                booking_id = created.id,
                user_id,
                zone_id = target_zone.id,
                place_id = candidate.id,
                "Booking created by time range"
            );
            self.emit(
                BookingEventType::BookingCreated,
                EventPayload::BookingCreated {
                    booking_id: created.id,
                    user_id: created.user_id,
                    zone_name: created.zone_name.clone(),
                    start_time: created.start_time,
                    end_time: created.end_time,
                },
            );
            return Ok(created);
        }
        Err(CreateBookingError::NoAvailablePlaces)
    }

    /// Cancel a booking as its owner, or as an admin.
    ///
    /// Silent-failure operation: `Ok(None)` when the booking is missing
    /// or the caller lacks permission. Cancelling an already terminal
    /// booking returns it unchanged and performs no writes.
    pub async fn cancel_booking(
        &self,
        user_id: i64,
        booking_id: i64,
        is_admin: bool,
    ) -> RepoResult<Option<Booking>> {
        match self.try_cancel_booking(user_id, booking_id, is_admin).await {
            Err(RepoError::Duplicate(_)) => Ok(None),
            other => other,
        }
    }

    async fn try_cancel_booking(
        &self,
        user_id: i64,
        booking_id: i64,
        is_admin: bool,
    ) -> RepoResult<Option<Booking>> {
        let now = self.clock.now_millis();
        let mut tx = self.db.write_pool.begin().await?;

        let Some(target) = booking::find_by_id(&mut *tx, booking_id).await? else {
            return Ok(None);
        };
        if !is_admin && target.user_id != user_id {
            return Ok(None);
        }
        if target.status != BookingStatus::Active {
            // idempotent: terminal bookings come back unchanged
            return Ok(Some(target));
        }

        if let Some(slot_id) = target.slot_id {
            slot::release(&mut *tx, slot_id).await?;
        }
        booking::cancel(&mut *tx, target.id, None, now).await?;
        let updated = booking::find_by_id(&mut *tx, target.id)
            .await?
            .ok_or_else(|| RepoError::Database("Booking disappeared during cancel".into()))?;
        tx.commit().await?;

        tracing::info!(booking_id = updated.id, user_id, is_admin, "Booking cancelled");
        self.emit(
            BookingEventType::BookingCancelled,
            EventPayload::BookingCancelled {
                booking_id: updated.id,
                user_id: updated.user_id,
                zone_name: updated.zone_name.clone(),
                start_time: updated.start_time,
                end_time: updated.end_time,
            },
        );
        Ok(Some(updated))
    }

    /// Extend an active booking by creating a new booking for the
    /// contiguous continuation interval. The original record is never
    /// mutated; its end time stays fixed.
    pub async fn extend_booking(
        &self,
        user_id: i64,
        booking_id: i64,
        extend_hours: i64,
        extend_minutes: i64,
    ) -> Result<Booking, ExtendBookingError> {
        let now = self.clock.now_millis();
        let mut tx = self
            .db
            .write_pool
            .begin()
            .await
            .map_err(RepoError::from)
            .map_err(ExtendBookingError::from)?;

        let Some(original) = booking::find_by_id(&mut *tx, booking_id).await? else {
            return Err(ExtendBookingError::BookingNotFound);
        };

        if original.end_time <= now {
            // lazy expiry: flip the stale row before refusing
            if original.status == BookingStatus::Active {
                booking::complete_one(&mut *tx, original.id, now).await?;
                tx.commit().await.map_err(RepoError::from)?;
            }
            return Err(ExtendBookingError::BookingExpired);
        }
        if original.user_id != user_id {
            return Err(ExtendBookingError::PermissionDenied);
        }
        if original.status != BookingStatus::Active {
            return Err(ExtendBookingError::InvalidStatus);
        }
        if original.end_time <= original.start_time {
            return Err(ExtendBookingError::InvalidData);
        }
        let Some(original_slot_id) = original.slot_id else {
            return Err(ExtendBookingError::SlotNotFound);
        };
        let Some(original_slot) = slot::find_by_id(&mut *tx, original_slot_id).await? else {
            return Err(ExtendBookingError::SlotNotFound);
        };

        let extension = extend_hours * 3_600_000 + extend_minutes * 60_000;
        if extension <= 0 {
            return Err(ExtendBookingError::InvalidData);
        }
        let new_end_time = original.end_time + extension;
        let max_hours = self.config.max_booking_hours;
        if new_end_time - original.start_time > max_hours * 3_600_000 {
            return Err(ExtendBookingError::MaxDurationExceeded { max_hours });
        }
        if booking::user_conflict_exists(
            &mut *tx,
            user_id,
            original.end_time,
            new_end_time,
            Some(original.id),
        )
        .await?
        {
            return Err(ExtendBookingError::UserTimeConflict);
        }

        let owner_place = place::find_by_id(&mut *tx, original_slot.place_id).await?;
        let owner_zone = match &owner_place {
            Some(p) => zone::find_by_id(&mut *tx, p.zone_id).await?,
            None => None,
        };
        let Some(owner_zone) = owner_zone else {
            return Err(ExtendBookingError::ZoneNotFound);
        };

        if !capacity::capacity_available(&mut tx, owner_zone.id, original.end_time, new_end_time)
            .await?
        {
            return Err(ExtendBookingError::ZoneCapacityExceeded);
        }

        let extended_slot = match slots::resolve_slot(
            &mut tx,
            original_slot.place_id,
            original.end_time,
            new_end_time,
        )
        .await?
        {
            SlotResolution::Reserved(s) => s,
            SlotResolution::Occupied => return Err(ExtendBookingError::SlotUnavailable),
            SlotResolution::PartiallyOccupied => {
                return Err(ExtendBookingError::SlotPartiallyOccupied);
            }
        };

        let continuation = booking::insert_active(
            &mut tx,
            user_id,
            extended_slot.id,
            Some(owner_zone.name.as_str()),
            owner_zone.address.as_deref(),
            original.end_time,
            new_end_time,
            now,
        )
        .await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            booking_id = original.id,
            continuation_id = continuation.id,
            user_id,
            new_end_time,
            "Booking extended"
        );
        self.emit(
            BookingEventType::BookingExtended,
            EventPayload::BookingExtended {
                booking_id: continuation.id,
                user_id: continuation.user_id,
                zone_name: continuation.zone_name.clone(),
                end_time: continuation.end_time,
            },
        );
        Ok(continuation)
    }

    /// Lazily complete every active booking whose end has passed.
    ///
    /// Runs inline on read/write paths (listing, history, statistics,
    /// extension), not on a background timer.
    pub async fn auto_complete_expired(&self) -> RepoResult<u64> {
        let now = self.clock.now_millis();
        let flipped = booking::complete_expired(&self.db.write_pool, now).await?;
        if flipped > 0 {
            tracing::debug!(count = flipped, "Auto-completed expired bookings");
        }
        Ok(flipped)
    }

    // ========================================================================
    // Zone closure and administration
    // ========================================================================

    /// Close a zone over a window: mark it inactive with the reason and
    /// lapse time, cancel every active booking overlapping the window
    /// and free their slots. Returns the cancelled bookings.
    pub async fn close_zone(
        &self,
        zone_id: i64,
        req: &ZoneCloseRequest,
    ) -> RepoResult<Vec<Booking>> {
        let now = self.clock.now_millis();
        let mut tx = self.db.write_pool.begin().await?;

        let Some(closed_zone) = zone::find_by_id(&mut *tx, zone_id).await? else {
            return Ok(Vec::new());
        };
        zone::set_closed(&mut *tx, zone_id, &req.reason, req.to_time, now).await?;

        let affected =
            booking::find_active_overlapping_closure(&mut *tx, zone_id, req.from_time, req.to_time)
                .await?;
        let reason = format!("Zone closed: {}", req.reason);
        let mut cancelled = Vec::with_capacity(affected.len());
        for b in &affected {
            if let Some(slot_id) = b.slot_id {
                slot::release(&mut *tx, slot_id).await?;
            }
            booking::cancel(&mut *tx, b.id, Some(&reason), now).await?;
            let updated = booking::find_by_id(&mut *tx, b.id)
                .await?
                .ok_or_else(|| RepoError::Database("Booking disappeared during closure".into()))?;
            cancelled.push(updated);
        }
        tx.commit().await?;

        tracing::info!(zone_id, affected = cancelled.len(), "Zone closed");
        for b in &cancelled {
            self.emit(
                BookingEventType::ZoneClosed,
                EventPayload::ZoneClosed {
                    booking_id: b.id,
                    user_id: b.user_id,
                    zone_name: closed_zone.name.clone(),
                    reason: req.reason.clone(),
                    start_time: b.start_time,
                    end_time: b.end_time,
                },
            );
        }
        Ok(cancelled)
    }

    pub async fn create_zone(&self, data: ZoneCreate) -> RepoResult<Zone> {
        let now = self.clock.now_millis();
        zone::create(&self.db.write_pool, data, now).await
    }

    pub async fn update_zone(&self, zone_id: i64, data: ZoneUpdate) -> RepoResult<Zone> {
        let now = self.clock.now_millis();
        zone::update(&self.db.write_pool, zone_id, data, now).await
    }

    pub async fn delete_zone(&self, zone_id: i64) -> RepoResult<bool> {
        zone::delete(&self.db.write_pool, zone_id).await
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// List zones with booking rollups. Sweeps expired bookings and
    /// reactivates lapsed closures first so the listing never reports
    /// stale state.
    pub async fn list_zones(&self, include_inactive: bool) -> RepoResult<Vec<ZoneSummary>> {
        self.auto_complete_expired().await?;
        let now = self.clock.now_millis();
        let reactivated = zone::reactivate_expired(&self.db.write_pool, now).await?;
        if reactivated > 0 {
            tracing::info!(count = reactivated, "Reactivated zones with lapsed closures");
        }

        let zones = zone::find_all(&self.db.pool, include_inactive).await?;
        let rollups: HashMap<i64, stats_repo::ZoneRollup> =
            stats_repo::zone_rollups(&self.db.pool, now)
                .await?
                .into_iter()
                .map(|r| (r.zone_id, r))
                .collect();

        Ok(zones
            .into_iter()
            .map(|z| {
                let rollup = rollups.get(&z.id);
                ZoneSummary {
                    id: z.id,
                    name: z.name,
                    address: z.address,
                    is_active: z.is_active,
                    closure_reason: z.closure_reason,
                    closed_until: z.closed_until,
                    created_at: z.created_at,
                    updated_at: z.updated_at,
                    active_bookings: rollup.map_or(0, |r| r.active_bookings),
                    cancelled_bookings: rollup.map_or(0, |r| r.cancelled_bookings),
                    current_occupancy: rollup.map_or(0, |r| r.current_occupancy),
                }
            })
            .collect())
    }

    pub async fn list_places(&self, zone_id: i64) -> RepoResult<Vec<Place>> {
        place::find_active_by_zone(&self.db.pool, zone_id).await
    }

    /// Slots on a place for one calendar day (business timezone)
    pub async fn list_slots(&self, place_id: i64, date: &str) -> RepoResult<Vec<Slot>> {
        let parsed = time::parse_date(date)
            .map_err(|_| RepoError::Validation(format!("Invalid date format: {date}")))?;
        let tz = self.config.business_timezone;
        let day_start = time::day_start_millis(parsed, tz);
        let day_end = time::day_end_millis(parsed, tz);
        slot::find_by_place_and_day(&self.db.pool, place_id, day_start, day_end).await
    }

    pub async fn get_booking(&self, booking_id: i64) -> RepoResult<Option<Booking>> {
        booking::find_by_id(&self.db.pool, booking_id).await
    }

    /// A user's booking history, newest first
    pub async fn get_booking_history(
        &self,
        user_id: i64,
        filters: &BookingHistoryFilters,
    ) -> RepoResult<Vec<Booking>> {
        self.auto_complete_expired().await?;
        booking::find_history(&self.db.pool, user_id, filters).await
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    pub async fn global_statistics(&self) -> RepoResult<GlobalStatistics> {
        self.auto_complete_expired().await?;
        stats::global_statistics(&self.db.pool, self.clock.now_millis()).await
    }

    pub async fn zone_statistics(&self) -> RepoResult<Vec<ZoneStatistics>> {
        self.auto_complete_expired().await?;
        stats::zone_statistics(&self.db.pool, self.clock.now_millis()).await
    }
}
