//! VerifyTrainerPaymentHandler - Confirms a trainer session after checkout.

use std::sync::Arc;

use crate::application::handlers::booking::VerifyPaymentCommand;
use crate::application::handlers::common::{ensure_order_matches, load_trainer, trainer_booking_not_found};
use crate::application::Notifier;
use crate::domain::booking::CapacityPolicy;
use crate::domain::foundation::{DomainError, ErrorCode, OwnedByUser, TrainerBookingId};
use crate::domain::monetization::{PaymentPurpose, PaymentTransaction};
use crate::domain::trainer::TrainerBooking;
use crate::ports::{PaymentGateway, TrainerBookingRepository, TrainerRepository};

pub struct VerifyTrainerPaymentHandler {
    trainer_bookings: Arc<dyn TrainerBookingRepository>,
    trainers: Arc<dyn TrainerRepository>,
    payments: Arc<dyn PaymentGateway>,
    notifier: Notifier,
    policy: CapacityPolicy,
}

impl VerifyTrainerPaymentHandler {
    pub fn new(
        trainer_bookings: Arc<dyn TrainerBookingRepository>,
        trainers: Arc<dyn TrainerRepository>,
        payments: Arc<dyn PaymentGateway>,
        notifier: Notifier,
        policy: CapacityPolicy,
    ) -> Self {
        Self {
            trainer_bookings,
            trainers,
            payments,
            notifier,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: VerifyPaymentCommand<TrainerBookingId>,
    ) -> Result<TrainerBooking, DomainError> {
        let mut booking = self
            .trainer_bookings
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| trainer_booking_not_found(&cmd.id))?;
        booking.check_ownership(&cmd.user.id)?;
        ensure_order_matches(booking.payment_order_id.as_deref(), &cmd.order_id)?;
        self.payments
            .verify_signature(&cmd.order_id, &cmd.payment_id, &cmd.signature)?;

        if !booking.confirm_payment(cmd.payment_id.clone())? {
            return Ok(booking);
        }

        let transaction = PaymentTransaction::record(
            PaymentPurpose::TrainerBooking,
            *booking.id.as_uuid(),
            cmd.order_id.clone(),
            cmd.payment_id.clone(),
            booking.price.total,
        );
        let confirmed = self
            .trainer_bookings
            .confirm_payment(&booking, &transaction, &self.policy)
            .await
            .map_err(|e| {
                if e.code == ErrorCode::TrainerUnavailable {
                    tracing::warn!(
                        trainer_booking_id = %booking.id,
                        payment_id = %cmd.payment_id,
                        "Late payment for a trainer slot that is no longer free; refund required"
                    );
                }
                e
            })?;
        if !confirmed {
            return self
                .trainer_bookings
                .find_by_id(&booking.id)
                .await?
                .ok_or_else(|| trainer_booking_not_found(&booking.id));
        }
        tracing::info!(trainer_booking_id = %booking.id, payment_id = %cmd.payment_id, "Trainer session paid");

        let trainer = load_trainer(self.trainers.as_ref(), &booking.trainer_id).await?;
        self.notifier
            .trainer_session_confirmed(&cmd.user.email, &trainer.profile.display_name, &booking);
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::payment::MockPaymentGateway;
    use crate::application::handlers::test_support::{hour, next_week, World};
    use crate::application::handlers::trainer::{CreateTrainerBookingCommand, CreateTrainerBookingHandler};
    use crate::domain::foundation::{CurrentUser, ErrorCode, Role};
    use crate::domain::trainer::TrainerBookingStatus;

    #[tokio::test]
    async fn confirms_and_rejects_mismatched_order() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let coach = world.user("arjun", Role::Trainer).await;
        let trainer = world.approved_trainer(&coach, &gym, 500).await;
        let asha = world.user("asha", Role::User).await;

        let booking = CreateTrainerBookingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
            World::policy(),
        )
        .handle(CreateTrainerBookingCommand {
            user: asha.clone(),
            trainer_id: trainer.id,
            date: next_week(),
            start_time: hour(7),
            duration_hours: None,
        })
        .await
        .unwrap()
        .booking;
        let handler = VerifyTrainerPaymentHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.notifier(),
            World::policy(),
        );

        let wrong_order = handler
            .handle(VerifyPaymentCommand {
                user: asha.clone(),
                id: booking.id,
                order_id: "order_other".to_string(),
                payment_id: "pay_1".to_string(),
                signature: MockPaymentGateway::sign("order_other", "pay_1"),
            })
            .await
            .unwrap_err();
        assert_eq!(wrong_order.code, ErrorCode::PaymentSignatureInvalid);

        let order_id = booking.payment_order_id.clone().unwrap();
        let confirmed = handler
            .handle(VerifyPaymentCommand {
                user: asha,
                id: booking.id,
                signature: MockPaymentGateway::sign(&order_id, "pay_1"),
                order_id,
                payment_id: "pay_1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(confirmed.status, TrainerBookingStatus::Confirmed);
        assert_eq!(world.store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn late_payment_refused_once_trainer_is_taken() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let coach = world.user("arjun", Role::Trainer).await;
        let trainer = world.approved_trainer(&coach, &gym, 500).await;
        let lapsed = CapacityPolicy::new(chrono::Duration::zero());
        let create = CreateTrainerBookingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
            lapsed,
        );

        let asha = world.user("asha", Role::User).await;
        let ravi = world.user("ravi", Role::User).await;
        let mut sessions = Vec::new();
        for user in [&asha, &ravi] {
            let booking = create
                .handle(CreateTrainerBookingCommand {
                    user: user.clone(),
                    trainer_id: trainer.id,
                    date: next_week(),
                    start_time: hour(7),
                    duration_hours: None,
                })
                .await
                .unwrap()
                .booking;
            sessions.push(booking);
        }

        let verify = VerifyTrainerPaymentHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.notifier(),
            lapsed,
        );
        let pay = |user: &CurrentUser, session: &TrainerBooking, payment_id: &str| {
            let order_id = session.payment_order_id.clone().unwrap();
            VerifyPaymentCommand {
                user: user.clone(),
                id: session.id,
                signature: MockPaymentGateway::sign(&order_id, payment_id),
                order_id,
                payment_id: payment_id.to_string(),
            }
        };

        verify.handle(pay(&ravi, &sessions[1], "pay_ravi")).await.unwrap();
        let err = verify
            .handle(pay(&asha, &sessions[0], "pay_asha"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TrainerUnavailable);
        assert_eq!(world.store.transaction_count().await, 1);
    }
}
