//! Booking-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | SlotUnavailable / SlotFull / TrainerUnavailable | 400 |
//! | AlreadyUsed / Cancelled / Expired / PaymentNotCompleted | 400 |
//! | InvalidState / InvalidSignature / ValidationFailed | 400 |

use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, Hour, HourRange, ValidationError,
};

/// Errors raised while creating, paying for or redeeming a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    NotFound(BookingId),

    /// No active slot covers the requested hour.
    SlotUnavailable { hour: Hour },

    /// The slot covering the hour is at capacity.
    SlotFull { hour: Hour, capacity: u32 },

    /// The trainer already has a booking intersecting the range.
    TrainerUnavailable { requested: HourRange, conflict: HourRange },

    AlreadyUsed(BookingId),

    Cancelled(BookingId),

    Expired(BookingId),

    PaymentNotCompleted(BookingId),

    InvalidState { current: String, attempted: String },

    /// Payment signature did not match the order/payment pair.
    InvalidSignature,

    ValidationFailed { field: String, message: String },
}

impl BookingError {
    pub fn not_found(id: BookingId) -> Self {
        BookingError::NotFound(id)
    }

    pub fn slot_unavailable(hour: Hour) -> Self {
        BookingError::SlotUnavailable { hour }
    }

    pub fn slot_full(hour: Hour, capacity: u32) -> Self {
        BookingError::SlotFull { hour, capacity }
    }

    pub fn trainer_unavailable(requested: HourRange, conflict: HourRange) -> Self {
        BookingError::TrainerUnavailable { requested, conflict }
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        BookingError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::NotFound(_) => ErrorCode::BookingNotFound,
            BookingError::SlotUnavailable { .. } => ErrorCode::SlotUnavailable,
            BookingError::SlotFull { .. } => ErrorCode::SlotFull,
            BookingError::TrainerUnavailable { .. } => ErrorCode::TrainerUnavailable,
            BookingError::AlreadyUsed(_) => ErrorCode::BookingAlreadyUsed,
            BookingError::Cancelled(_) => ErrorCode::BookingCancelled,
            BookingError::Expired(_) => ErrorCode::BookingExpired,
            BookingError::PaymentNotCompleted(_) => ErrorCode::PaymentNotCompleted,
            BookingError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            BookingError::InvalidSignature => ErrorCode::PaymentSignatureInvalid,
            BookingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            BookingError::NotFound(id) => format!("Booking not found: {}", id),
            BookingError::SlotUnavailable { hour } => {
                format!("No time slot available at {}", hour)
            }
            BookingError::SlotFull { hour, capacity } => {
                format!("Time slot at {} is full (capacity {})", hour, capacity)
            }
            BookingError::TrainerUnavailable { requested, conflict } => format!(
                "Trainer is not available for {}; already booked {}",
                requested, conflict
            ),
            BookingError::AlreadyUsed(_) => "Booking has already been used".to_string(),
            BookingError::Cancelled(_) => "Booking has been cancelled".to_string(),
            BookingError::Expired(_) => "Booking has expired".to_string(),
            BookingError::PaymentNotCompleted(_) => {
                "Payment for this booking is not completed".to_string()
            }
            BookingError::InvalidState { current, attempted } => {
                format!("Cannot {} a booking that is {}", attempted, current)
            }
            BookingError::InvalidSignature => "Payment verification failed".to_string(),
            BookingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
        }
    }
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BookingError {}

impl From<BookingError> for DomainError {
    fn from(err: BookingError) -> Self {
        let base = DomainError::new(err.code(), err.message());
        match &err {
            BookingError::NotFound(id)
            | BookingError::AlreadyUsed(id)
            | BookingError::Cancelled(id)
            | BookingError::Expired(id)
            | BookingError::PaymentNotCompleted(id) => base.with_detail("booking_id", id.to_string()),
            BookingError::SlotUnavailable { hour } => base.with_detail("time", hour.to_string()),
            BookingError::SlotFull { hour, capacity } => base
                .with_detail("time", hour.to_string())
                .with_detail("capacity", capacity.to_string()),
            BookingError::TrainerUnavailable { conflict, .. } => {
                base.with_detail("conflict", conflict.to_string())
            }
            BookingError::ValidationFailed { field, .. } => base.with_detail("field", field.clone()),
            BookingError::InvalidState { .. } | BookingError::InvalidSignature => base,
        }
    }
}

impl From<ValidationError> for BookingError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        BookingError::ValidationFailed {
            field,
            message: err.to_string(),
        }
    }
}
