//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    OutOfRange,
    InvalidFormat,

    // Not found errors
    UserNotFound,
    GymNotFound,
    ServiceNotFound,
    SlotNotFound,
    BookingNotFound,
    TrainerNotFound,
    TrainerBookingNotFound,
    FeaturedListingNotFound,

    // Conflict and state errors
    InvalidStateTransition,
    SlotUnavailable,
    SlotFull,
    SlotOverlap,
    TrainerUnavailable,
    BookingAlreadyUsed,
    BookingCancelled,
    BookingExpired,
    PaymentNotCompleted,
    PaymentSignatureInvalid,
    GymNotApproved,
    TrainerNotApproved,
    TrainerAlreadyRegistered,
    ReviewNotAllowed,
    ReviewAlreadyExists,

    // Authorization errors
    Unauthorized,
    Forbidden,

    // External service errors
    PaymentGatewayError,
    MediaUploadError,
    EmailError,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    /// Returns true for not-found codes.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::UserNotFound
                | ErrorCode::GymNotFound
                | ErrorCode::ServiceNotFound
                | ErrorCode::SlotNotFound
                | ErrorCode::BookingNotFound
                | ErrorCode::TrainerNotFound
                | ErrorCode::TrainerBookingNotFound
                | ErrorCode::FeaturedListingNotFound
        )
    }

    /// Returns true for failures the caller cannot fix by changing the request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ErrorCode::PaymentGatewayError
                | ErrorCode::MediaUploadError
                | ErrorCode::EmailError
                | ErrorCode::DatabaseError
                | ErrorCode::InternalError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::GymNotFound => "GYM_NOT_FOUND",
            ErrorCode::ServiceNotFound => "SERVICE_NOT_FOUND",
            ErrorCode::SlotNotFound => "SLOT_NOT_FOUND",
            ErrorCode::BookingNotFound => "BOOKING_NOT_FOUND",
            ErrorCode::TrainerNotFound => "TRAINER_NOT_FOUND",
            ErrorCode::TrainerBookingNotFound => "TRAINER_BOOKING_NOT_FOUND",
            ErrorCode::FeaturedListingNotFound => "FEATURED_LISTING_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::SlotUnavailable => "SLOT_UNAVAILABLE",
            ErrorCode::SlotFull => "SLOT_FULL",
            ErrorCode::SlotOverlap => "SLOT_OVERLAP",
            ErrorCode::TrainerUnavailable => "TRAINER_UNAVAILABLE",
            ErrorCode::BookingAlreadyUsed => "BOOKING_ALREADY_USED",
            ErrorCode::BookingCancelled => "BOOKING_CANCELLED",
            ErrorCode::BookingExpired => "BOOKING_EXPIRED",
            ErrorCode::PaymentNotCompleted => "PAYMENT_NOT_COMPLETED",
            ErrorCode::PaymentSignatureInvalid => "PAYMENT_SIGNATURE_INVALID",
            ErrorCode::GymNotApproved => "GYM_NOT_APPROVED",
            ErrorCode::TrainerNotApproved => "TRAINER_NOT_APPROVED",
            ErrorCode::TrainerAlreadyRegistered => "TRAINER_ALREADY_REGISTERED",
            ErrorCode::ReviewNotAllowed => "REVIEW_NOT_ALLOWED",
            ErrorCode::ReviewAlreadyExists => "REVIEW_ALREADY_EXISTS",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::PaymentGatewayError => "PAYMENT_GATEWAY_ERROR",
            ErrorCode::MediaUploadError => "MEDIA_UPLOAD_ERROR",
            ErrorCode::EmailError => "EMAIL_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Creates a database error with context.
    pub fn database(context: &str, err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, format!("{}: {}", context, err))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        };
        let field = err.field().to_string();
        DomainError::new(code, err.to_string()).with_detail("field", field)
    }
}
