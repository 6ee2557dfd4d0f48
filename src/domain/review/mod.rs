//! Verified-purchase reviews.
//!
//! A review is written through one consumed booking: a used gym booking
//! reviews the gym, a completed trainer booking reviews the trainer. Each
//! booking yields at most one review (unique index in storage). Reviews
//! are immutable.

use serde::{Deserialize, Serialize};

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, GymId, OwnedByUser, Rating, ReviewId, Timestamp,
    TrainerBookingId, TrainerId, UserId, ValidationError,
};
use crate::domain::trainer::{TrainerBooking, TrainerBookingStatus};

const MAX_COMMENT_CHARS: usize = 2000;

/// What is being reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target_type", content = "target_id", rename_all = "snake_case")]
pub enum ReviewTarget {
    Gym(GymId),
    Trainer(TrainerId),
}

/// The purchase that entitles the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source_type", content = "source_id", rename_all = "snake_case")]
pub enum ReviewSource {
    Booking(BookingId),
    TrainerBooking(TrainerBookingId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub target: ReviewTarget,
    pub source: ReviewSource,
    pub rating: Rating,
    pub comment: String,
    pub created_at: Timestamp,
}

impl Review {
    /// Reviews the gym of a fully used booking.
    pub fn for_booking(
        reviewer: &UserId,
        booking: &Booking,
        rating: Rating,
        comment: impl Into<String>,
    ) -> Result<Self, DomainError> {
        booking.check_ownership(reviewer)?;
        if booking.status != BookingStatus::Used {
            return Err(not_allowed(booking.status.as_str()));
        }
        Self::build(
            *reviewer,
            ReviewTarget::Gym(booking.gym_id),
            ReviewSource::Booking(booking.id),
            rating,
            comment.into(),
        )
    }

    /// Reviews the trainer of a completed session.
    pub fn for_trainer_booking(
        reviewer: &UserId,
        booking: &TrainerBooking,
        rating: Rating,
        comment: impl Into<String>,
    ) -> Result<Self, DomainError> {
        booking.check_ownership(reviewer)?;
        if booking.status != TrainerBookingStatus::Completed {
            return Err(not_allowed(booking.status.as_str()));
        }
        Self::build(
            *reviewer,
            ReviewTarget::Trainer(booking.trainer_id),
            ReviewSource::TrainerBooking(booking.id),
            rating,
            comment.into(),
        )
    }

    fn build(
        user_id: UserId,
        target: ReviewTarget,
        source: ReviewSource,
        rating: Rating,
        comment: String,
    ) -> Result<Self, DomainError> {
        let comment = comment.trim().to_string();
        let len = comment.chars().count();
        if len > MAX_COMMENT_CHARS {
            return Err(ValidationError::out_of_range(
                "comment",
                0,
                MAX_COMMENT_CHARS as i64,
                len as i64,
            )
            .into());
        }
        Ok(Self {
            id: ReviewId::new(),
            user_id,
            target,
            source,
            rating,
            comment,
            created_at: Timestamp::now(),
        })
    }
}

fn not_allowed(status: &str) -> DomainError {
    DomainError::new(
        ErrorCode::ReviewNotAllowed,
        "Only completed bookings can be reviewed",
    )
    .with_detail("status", status)
}
