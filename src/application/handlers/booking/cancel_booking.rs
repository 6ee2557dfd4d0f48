//! CancelBookingHandler - Member cancellation of a confirmed booking.

use std::sync::Arc;

use crate::application::handlers::common::{booking_not_found, concurrent_change};
use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, CurrentUser, DomainError, OwnedByUser};
use crate::ports::BookingRepository;

#[derive(Debug, Clone)]
pub struct CancelBookingCommand {
    pub user: CurrentUser,
    pub booking_id: BookingId,
}

/// Refunds are handled outside the platform; cancelling frees the
/// capacity and removes the booking from earnings.
pub struct CancelBookingHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl CancelBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, cmd: CancelBookingCommand) -> Result<Booking, DomainError> {
        let mut booking = self
            .bookings
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| booking_not_found(&cmd.booking_id))?;
        booking.check_owner_or_admin(&cmd.user.id, cmd.user.is_super_admin())?;

        let expected_status = booking.status;
        let expected_remaining = booking.remaining_sessions;
        booking.cancel()?;

        if !self
            .bookings
            .compare_and_update(&booking, expected_status, expected_remaining)
            .await?
        {
            return Err(concurrent_change("Booking"));
        }
        tracing::info!(booking_id = %booking.id, "Booking cancelled");
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::payment::MockPaymentGateway;
    use crate::application::handlers::booking::{
        CreateBookingCommand, CreateBookingHandler, VerifyBookingPaymentHandler, VerifyPaymentCommand,
    };
    use crate::application::handlers::test_support::{hour, next_week, World};
    use crate::domain::booking::BookingStatus;
    use crate::domain::foundation::{ErrorCode, Role};
    use crate::domain::gym::ServiceType;

    #[tokio::test]
    async fn only_confirmed_bookings_cancel_and_capacity_is_freed() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let service = world.service(&gym, ServiceType::Session, 300).await;
        let date = next_week();
        world.slot(&gym, date, 6, 8, 1).await;
        let asha = world.user("asha", Role::User).await;
        let ravi = world.user("ravi", Role::User).await;

        let booker = CreateBookingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
            World::policy(),
        );
        let cmd = |user: &CurrentUser| CreateBookingCommand {
            user: user.clone(),
            service_id: service.id,
            date,
            start_time: Some(hour(6)),
            duration_hours: Some(1),
            trainer_id: None,
        };
        let booking = booker.handle(cmd(&asha)).await.unwrap().booking;
        let cancel = CancelBookingHandler::new(world.store.clone());

        // Unpaid checkouts are not cancellable.
        let err = cancel
            .handle(CancelBookingCommand {
                user: asha.clone(),
                booking_id: booking.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);

        let order_id = booking.payment_order_id.clone().unwrap();
        VerifyBookingPaymentHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.notifier(),
            World::policy(),
        )
        .handle(VerifyPaymentCommand {
            user: asha.clone(),
            id: booking.id,
            signature: MockPaymentGateway::sign(&order_id, "pay_1"),
            order_id,
            payment_id: "pay_1".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(booker.handle(cmd(&ravi)).await.unwrap_err().code, ErrorCode::SlotFull);

        let cancelled = cancel
            .handle(CancelBookingCommand {
                user: asha,
                booking_id: booking.id,
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        booker.handle(cmd(&ravi)).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_booking_not_found() {
        let world = World::new();
        let asha = world.user("asha", Role::User).await;
        let err = CancelBookingHandler::new(world.store.clone())
            .handle(CancelBookingCommand {
                user: asha,
                booking_id: BookingId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BookingNotFound);
    }
}
