//! Shared types for the booking platform
//!
//! Common types used across the booking engine and its external
//! collaborators (gateway, notifier): data models, domain events,
//! and utility functions.

pub mod booking;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Event re-exports (for convenient access from the notifier side)
pub use booking::{BookingEvent, BookingEventType};
