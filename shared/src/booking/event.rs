//! Booking events - immutable facts recorded after a committed transition

use serde::{Deserialize, Serialize};

/// Booking event - emitted after commit, consumed by the notifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    /// Server timestamp (Unix milliseconds) when the event was emitted
    pub timestamp: i64,
    /// Event type
    pub event_type: BookingEventType,
    /// Event payload
    pub payload: EventPayload,
}

/// Event type enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingEventType {
    BookingCreated,
    BookingCancelled,
    BookingExtended,
    ZoneClosed,
}

impl std::fmt::Display for BookingEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingEventType::BookingCreated => write!(f, "BOOKING_CREATED"),
            BookingEventType::BookingCancelled => write!(f, "BOOKING_CANCELLED"),
            BookingEventType::BookingExtended => write!(f, "BOOKING_EXTENDED"),
            BookingEventType::ZoneClosed => write!(f, "ZONE_CLOSED"),
        }
    }
}

/// Event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind")]
pub enum EventPayload {
    BookingCreated {
        booking_id: i64,
        user_id: i64,
        zone_name: Option<String>,
        start_time: i64,
        end_time: i64,
    },
    BookingCancelled {
        booking_id: i64,
        user_id: i64,
        zone_name: Option<String>,
        start_time: i64,
        end_time: i64,
    },
    BookingExtended {
        booking_id: i64,
        user_id: i64,
        zone_name: Option<String>,
        /// End of the continuation interval
        end_time: i64,
    },
    ZoneClosed {
        booking_id: i64,
        user_id: i64,
        zone_name: String,
        reason: String,
        start_time: i64,
        end_time: i64,
    },
}

impl BookingEvent {
    pub fn new(timestamp: i64, event_type: BookingEventType, payload: EventPayload) -> Self {
        Self {
            timestamp,
            event_type,
            payload,
        }
    }
}
