//! RedeemBookingHandler - Front-desk check-in by booking id or QR token.

use std::sync::Arc;

use crate::application::handlers::common::{booking_not_found, concurrent_change, load_gym};
use crate::domain::booking::{Booking, BookingError, Redemption, RedemptionToken};
use crate::domain::foundation::{BookingId, CurrentUser, DomainError, ErrorCode, OwnedByUser, Timestamp};
use crate::ports::{BookingRepository, GymRepository};

#[derive(Debug, Clone)]
pub enum RedeemTarget {
    Id(BookingId),
    /// The QR payload as scanned.
    Token(String),
}

#[derive(Debug, Clone)]
pub struct RedeemBookingCommand {
    pub user: CurrentUser,
    pub target: RedeemTarget,
}

#[derive(Debug, Clone)]
pub struct RedeemResult {
    pub redemption: Redemption,
    pub booking: Booking,
}

/// Consumes one visit of a paid booking.
///
/// Only the owner of the booking's gym (or a super-admin) may redeem. The
/// write is a compare-and-set on status and remaining sessions, so two
/// desks scanning the same code cannot both consume the last visit.
pub struct RedeemBookingHandler {
    bookings: Arc<dyn BookingRepository>,
    gyms: Arc<dyn GymRepository>,
}

impl RedeemBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>, gyms: Arc<dyn GymRepository>) -> Self {
        Self { bookings, gyms }
    }

    pub async fn handle(&self, cmd: RedeemBookingCommand) -> Result<RedeemResult, DomainError> {
        let mut booking = match &cmd.target {
            RedeemTarget::Id(id) => self
                .bookings
                .find_by_id(id)
                .await?
                .ok_or_else(|| booking_not_found(id))?,
            RedeemTarget::Token(raw) => {
                let token = RedemptionToken::parse(raw)?;
                self.bookings.find_by_token(&token).await?.ok_or_else(|| {
                    DomainError::new(ErrorCode::BookingNotFound, "No booking for this code")
                })?
            }
        };

        let gym = load_gym(self.gyms.as_ref(), &booking.gym_id).await?;
        gym.check_owner_or_admin(&cmd.user.id, cmd.user.is_super_admin())?;

        let expected_status = booking.status;
        let expected_remaining = booking.remaining_sessions;

        match booking.redeem(&Timestamp::now()) {
            Ok(redemption) => {
                if !self
                    .bookings
                    .compare_and_update(&booking, expected_status, expected_remaining)
                    .await?
                {
                    return Err(concurrent_change("Booking"));
                }
                tracing::info!(
                    booking_id = %booking.id,
                    gym_id = %gym.id,
                    status = %booking.status,
                    remaining = ?booking.remaining_sessions,
                    "Booking redeemed"
                );
                Ok(RedeemResult { redemption, booking })
            }
            Err(BookingError::Expired(id)) => {
                if expected_status != booking.status {
                    // Lapsed since the last look; record it. Losing the race
                    // to another writer changes nothing for this caller.
                    self.bookings
                        .compare_and_update(&booking, expected_status, expected_remaining)
                        .await?;
                    tracing::info!(booking_id = %id, "Booking expired at redemption");
                }
                Err(BookingError::Expired(id).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
