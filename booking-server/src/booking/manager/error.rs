use crate::db::repository::RepoError;
use thiserror::Error;

/// Coded errors for create-by-time-range. The `code()` strings are the
/// external contract surface; upstream callers and tests key on them.
#[derive(Debug, Error)]
pub enum CreateBookingError {
    #[error("Invalid date")]
    InvalidDate,

    #[error("Invalid time range: end time must be after start time")]
    InvalidTimeRange,

    #[error("Booking time limit exceeded: maximum {max_hours} hours")]
    TimeLimitExceeded { max_hours: i64 },

    #[error("Zone is unavailable or inactive")]
    ZoneInactive,

    #[error("You already have an active booking for this time")]
    UserConflict,

    #[error("Zone is full: maximum capacity reached")]
    ZoneCapacityExceeded,

    #[error("No free places for the requested time")]
    NoAvailablePlaces,

    #[error("No free places for the requested time (conflict during creation)")]
    NoAvailablePlacesConflict,

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl CreateBookingError {
    /// Stable error code for upstream mapping
    pub fn code(&self) -> &'static str {
        match self {
            CreateBookingError::InvalidDate => "INVALID_DATE",
            CreateBookingError::InvalidTimeRange => "INVALID_TIME_RANGE",
            CreateBookingError::TimeLimitExceeded { .. } => "TIME_LIMIT_EXCEEDED",
            CreateBookingError::ZoneInactive => "ZONE_INACTIVE",
            CreateBookingError::UserConflict => "USER_CONFLICT",
            CreateBookingError::ZoneCapacityExceeded => "ZONE_CAPACITY_EXCEEDED",
            CreateBookingError::NoAvailablePlaces => "NO_AVAILABLE_PLACES",
            CreateBookingError::NoAvailablePlacesConflict => "NO_AVAILABLE_PLACES",
            CreateBookingError::Storage(_) => "INTERNAL_ERROR",
        }
    }
}

/// Coded errors for booking extension, ordered as the checks run
#[derive(Debug, Error)]
pub enum ExtendBookingError {
    #[error("Booking not found")]
    BookingNotFound,

    #[error("Booking already completed: the slot has expired. Create a new booking.")]
    BookingExpired,

    #[error("No permission to extend this booking")]
    PermissionDenied,

    #[error("Only an active booking can be extended")]
    InvalidStatus,

    #[error("Booking has invalid data")]
    InvalidData,

    #[error("Booking slot not found")]
    SlotNotFound,

    #[error("Maximum booking limit exceeded ({max_hours} hours)")]
    MaxDurationExceeded { max_hours: i64 },

    #[error("You already have another booking for this time")]
    UserTimeConflict,

    #[error("Zone not found")]
    ZoneNotFound,

    #[error("Zone is full for the selected time. Try a shorter extension")]
    ZoneCapacityExceeded,

    #[error("The selected time is already taken. Try a shorter extension")]
    SlotUnavailable,

    #[error("The selected time is partially taken. Try a shorter extension")]
    SlotPartiallyOccupied,

    #[error("Could not extend the booking - the slot may already be taken")]
    IntegrityError,

    #[error("Storage error: {0}")]
    Storage(RepoError),
}

impl ExtendBookingError {
    /// Stable error code for upstream mapping
    pub fn code(&self) -> &'static str {
        match self {
            ExtendBookingError::BookingNotFound => "booking_not_found",
            ExtendBookingError::BookingExpired => "booking_expired",
            ExtendBookingError::PermissionDenied => "permission_denied",
            ExtendBookingError::InvalidStatus => "invalid_status",
            ExtendBookingError::InvalidData => "invalid_data",
            ExtendBookingError::SlotNotFound => "slot_not_found",
            ExtendBookingError::MaxDurationExceeded { .. } => "max_duration_exceeded",
            ExtendBookingError::UserTimeConflict => "user_time_conflict",
            ExtendBookingError::ZoneNotFound => "zone_not_found",
            ExtendBookingError::ZoneCapacityExceeded => "zone_capacity_exceeded",
            ExtendBookingError::SlotUnavailable => "slot_unavailable",
            ExtendBookingError::SlotPartiallyOccupied => "slot_partially_occupied",
            ExtendBookingError::IntegrityError => "integrity_error",
            ExtendBookingError::Storage(_) => "internal_error",
        }
    }
}

impl From<RepoError> for ExtendBookingError {
    fn from(err: RepoError) -> Self {
        // A lost race on slot creation surfaces as a unique violation;
        // everything else is an unexpected storage failure
        match err {
            RepoError::Duplicate(_) => ExtendBookingError::IntegrityError,
            other => ExtendBookingError::Storage(other),
        }
    }
}
