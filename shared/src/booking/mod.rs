//! Booking domain events
//!
//! Emitted by the engine after each committed lifecycle transition and
//! consumed asynchronously by the notifier. Delivery is fire-and-forget:
//! a slow or failed consumer never blocks or reverts a booking.

pub mod event;

pub use event::{BookingEvent, BookingEventType, EventPayload};
