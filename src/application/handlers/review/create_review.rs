//! CreateReviewHandler - Verified-purchase review of a gym or trainer.

use std::sync::Arc;

use serde::Serialize;

use crate::application::handlers::common::{booking_not_found, trainer_booking_not_found};
use crate::domain::foundation::{CurrentUser, DomainError, Rating, RatingSummary};
use crate::domain::review::{Review, ReviewSource};
use crate::ports::{BookingRepository, ReviewRepository, TrainerBookingRepository};

#[derive(Debug, Clone)]
pub struct CreateReviewCommand {
    pub user: CurrentUser,
    pub source: ReviewSource,
    pub rating: i32,
    pub comment: String,
}

/// The stored review plus the target's recomputed score.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCreated {
    pub review: Review,
    pub summary: RatingSummary,
}

pub struct CreateReviewHandler {
    bookings: Arc<dyn BookingRepository>,
    trainer_bookings: Arc<dyn TrainerBookingRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl CreateReviewHandler {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        trainer_bookings: Arc<dyn TrainerBookingRepository>,
        reviews: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            bookings,
            trainer_bookings,
            reviews,
        }
    }

    pub async fn handle(&self, cmd: CreateReviewCommand) -> Result<ReviewCreated, DomainError> {
        let rating = Rating::try_new(cmd.rating)?;

        let review = match cmd.source {
            ReviewSource::Booking(id) => {
                let booking = self
                    .bookings
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| booking_not_found(&id))?;
                Review::for_booking(&cmd.user.id, &booking, rating, cmd.comment)?
            }
            ReviewSource::TrainerBooking(id) => {
                let booking = self
                    .trainer_bookings
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| trainer_booking_not_found(&id))?;
                Review::for_trainer_booking(&cmd.user.id, &booking, rating, cmd.comment)?
            }
        };

        // Uniqueness per source booking is enforced by the store.
        let summary = self.reviews.insert_and_recompute(&review).await?;
        tracing::info!(
            review_id = %review.id,
            rating = review.rating.value(),
            total_reviews = summary.total_reviews,
            "Review created"
        );
        Ok(ReviewCreated { review, summary })
    }
}
