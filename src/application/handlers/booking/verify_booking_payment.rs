//! VerifyBookingPaymentHandler - Confirms a booking after checkout.

use std::sync::Arc;

use crate::application::handlers::common::{booking_not_found, ensure_order_matches, load_gym};
use crate::application::Notifier;
use crate::domain::booking::{Booking, CapacityPolicy};
use crate::domain::foundation::{BookingId, CurrentUser, DomainError, ErrorCode, OwnedByUser};
use crate::domain::monetization::{PaymentPurpose, PaymentTransaction};
use crate::ports::{BookingRepository, GymRepository, PaymentGateway};

/// The gateway's checkout callback fields.
#[derive(Debug, Clone)]
pub struct VerifyPaymentCommand<Id> {
    pub user: CurrentUser,
    pub id: Id,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Verifies the gateway signature and confirms the booking.
///
/// Repeating a successful verification returns the stored booking without
/// writing a second payment log row. A payment arriving after the checkout's
/// hold lapsed only confirms if the place is still free.
pub struct VerifyBookingPaymentHandler {
    bookings: Arc<dyn BookingRepository>,
    gyms: Arc<dyn GymRepository>,
    payments: Arc<dyn PaymentGateway>,
    notifier: Notifier,
    policy: CapacityPolicy,
}

impl VerifyBookingPaymentHandler {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        gyms: Arc<dyn GymRepository>,
        payments: Arc<dyn PaymentGateway>,
        notifier: Notifier,
        policy: CapacityPolicy,
    ) -> Self {
        Self {
            bookings,
            gyms,
            payments,
            notifier,
            policy,
        }
    }

    pub async fn handle(&self, cmd: VerifyPaymentCommand<BookingId>) -> Result<Booking, DomainError> {
        let mut booking = self
            .bookings
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| booking_not_found(&cmd.id))?;
        booking.check_ownership(&cmd.user.id)?;
        ensure_order_matches(booking.payment_order_id.as_deref(), &cmd.order_id)?;

        self.payments
            .verify_signature(&cmd.order_id, &cmd.payment_id, &cmd.signature)
            .map_err(|e| {
                tracing::warn!(booking_id = %booking.id, order_id = %cmd.order_id, "Payment signature rejected");
                DomainError::from(e)
            })?;

        if !booking.confirm_payment(cmd.payment_id.clone())? {
            return Ok(booking);
        }

        let transaction = PaymentTransaction::record(
            PaymentPurpose::Booking,
            *booking.id.as_uuid(),
            cmd.order_id.clone(),
            cmd.payment_id.clone(),
            booking.price.total,
        );
        let confirmed = self
            .bookings
            .confirm_payment(&booking, &transaction, &self.policy)
            .await
            .map_err(|e| {
                if e.code == ErrorCode::SlotFull || e.code == ErrorCode::TrainerUnavailable {
                    tracing::warn!(
                        booking_id = %booking.id,
                        payment_id = %cmd.payment_id,
                        error = %e,
                        "Late payment for a place that is no longer free; refund required"
                    );
                }
                e
            })?;
        if !confirmed {
            // A concurrent verification got there first.
            return self
                .bookings
                .find_by_id(&booking.id)
                .await?
                .ok_or_else(|| booking_not_found(&booking.id));
        }

        tracing::info!(
            booking_id = %booking.id,
            payment_id = %cmd.payment_id,
            amount = booking.price.total.minor(),
            "Booking payment verified"
        );

        let gym = load_gym(self.gyms.as_ref(), &booking.gym_id).await?;
        self.notifier
            .booking_confirmed(&cmd.user.email, &gym.details.name, &booking);

        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::payment::MockPaymentGateway;
    use crate::application::handlers::booking::{CreateBookingCommand, CreateBookingHandler};
    use crate::application::handlers::test_support::{hour, next_week, World};
    use crate::domain::booking::{BookingStatus, PaymentStatus};
    use crate::domain::foundation::{ErrorCode, Role};
    use crate::domain::gym::ServiceType;

    async fn checkout(world: &World, user: &CurrentUser) -> Booking {
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let pass = world.service(&gym, ServiceType::Pass, 2000).await;
        CreateBookingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
            World::policy(),
        )
        .handle(CreateBookingCommand {
            user: user.clone(),
            service_id: pass.id,
            date: next_week(),
            start_time: None,
            duration_hours: None,
            trainer_id: None,
        })
        .await
        .unwrap()
        .booking
    }

    fn handler(world: &World) -> VerifyBookingPaymentHandler {
        VerifyBookingPaymentHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.notifier(),
            World::policy(),
        )
    }

    fn signed(user: &CurrentUser, booking: &Booking, payment_id: &str) -> VerifyPaymentCommand<BookingId> {
        let order_id = booking.payment_order_id.clone().unwrap();
        VerifyPaymentCommand {
            user: user.clone(),
            id: booking.id,
            signature: MockPaymentGateway::sign(&order_id, payment_id),
            order_id,
            payment_id: payment_id.to_string(),
        }
    }

    #[tokio::test]
    async fn valid_signature_confirms_once() {
        let world = World::new();
        let asha = world.user("asha", Role::User).await;
        let booking = checkout(&world, &asha).await;
        let h = handler(&world);

        let confirmed = h.handle(signed(&asha, &booking, "pay_1")).await.unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(confirmed.payment_status, PaymentStatus::Completed);

        let again = h.handle(signed(&asha, &booking, "pay_1")).await.unwrap();
        assert_eq!(again.status, BookingStatus::Confirmed);
        assert_eq!(world.store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn bad_signature_rejected_and_nothing_written() {
        let world = World::new();
        let asha = world.user("asha", Role::User).await;
        let booking = checkout(&world, &asha).await;

        let mut cmd = signed(&asha, &booking, "pay_1");
        cmd.signature = "00".repeat(32);
        let err = handler(&world).handle(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentSignatureInvalid);

        let stored = BookingRepository::find_by_id(world.store.as_ref(), &booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BookingStatus::PendingPayment);
        assert_eq!(world.store.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn someone_elses_booking_forbidden() {
        let world = World::new();
        let asha = world.user("asha", Role::User).await;
        let ravi = world.user("ravi", Role::User).await;
        let booking = checkout(&world, &asha).await;

        let err = handler(&world)
            .handle(signed(&ravi, &booking, "pay_1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn late_payment_refused_once_place_is_taken() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let hourly = world.service(&gym, ServiceType::Session, 300).await;
        world.slot(&gym, next_week(), 17, 19, 1).await;

        // With no hold window neither checkout keeps the place reserved.
        let lapsed = CapacityPolicy::new(chrono::Duration::zero());
        let create = CreateBookingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
            lapsed,
        );
        let asha = world.user("asha", Role::User).await;
        let ravi = world.user("ravi", Role::User).await;
        let mut checkouts = Vec::new();
        for user in [&asha, &ravi] {
            let booking = create
                .handle(CreateBookingCommand {
                    user: user.clone(),
                    service_id: hourly.id,
                    date: next_week(),
                    start_time: Some(hour(18)),
                    duration_hours: Some(1),
                    trainer_id: None,
                })
                .await
                .unwrap()
                .booking;
            checkouts.push(booking);
        }

        let verify = VerifyBookingPaymentHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.notifier(),
            lapsed,
        );
        let first = verify.handle(signed(&ravi, &checkouts[1], "pay_ravi")).await.unwrap();
        assert_eq!(first.status, BookingStatus::Confirmed);

        let err = verify
            .handle(signed(&asha, &checkouts[0], "pay_asha"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotFull);

        let stored = BookingRepository::find_by_id(world.store.as_ref(), &checkouts[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BookingStatus::PendingPayment);
        assert_eq!(world.store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn late_payment_confirms_while_place_is_free() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let hourly = world.service(&gym, ServiceType::Session, 300).await;
        world.slot(&gym, next_week(), 17, 19, 1).await;
        let lapsed = CapacityPolicy::new(chrono::Duration::zero());
        let asha = world.user("asha", Role::User).await;

        let booking = CreateBookingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
            lapsed,
        )
        .handle(CreateBookingCommand {
            user: asha.clone(),
            service_id: hourly.id,
            date: next_week(),
            start_time: Some(hour(17)),
            duration_hours: Some(2),
            trainer_id: None,
        })
        .await
        .unwrap()
        .booking;

        let confirmed = VerifyBookingPaymentHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.notifier(),
            lapsed,
        )
        .handle(signed(&asha, &booking, "pay_1"))
        .await
        .unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
    }
}
