//! Booking allocation engine
//!
//! - `capacity`: sweep-line interval-overlap counting over a zone
//! - `slots`: find-or-create slot resolution on a place
//! - `manager`: lifecycle orchestration (create / cancel / extend /
//!   auto-complete / zone closure) and the public operation surface
//! - `stats`: read-only statistics rollups

pub mod capacity;
pub mod manager;
pub mod slots;
pub mod stats;

pub use manager::{BookingManager, CreateBookingError, ExtendBookingError};
pub use slots::SlotResolution;
