//! Foundation module - Shared domain primitives.
//!
//! Value objects, identifiers, error types and cross-cutting traits that
//! form the vocabulary of the marketplace domain.

mod approval_status;
mod auth;
mod commission_rate;
mod errors;
mod hours;
mod ids;
mod money;
mod ownership;
mod rating;
mod state_machine;
mod timestamp;

pub use approval_status::ApprovalStatus;
pub use auth::{AuthError, CurrentUser, IdentityClaims, Role};
pub use commission_rate::CommissionRate;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use hours::{DayOfWeek, Hour, HourRange};
pub use ids::{
    BookingId, FeaturedListingId, GymId, PayoutId, ReviewId, ServiceId, SlotId, TrainerBookingId,
    TrainerId, UserId,
};
pub use money::Money;
pub use ownership::OwnedByUser;
pub use rating::{Rating, RatingSummary};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
