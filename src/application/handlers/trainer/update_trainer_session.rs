//! UpdateTrainerSessionHandler - Completes or cancels a paid trainer session.

use std::sync::Arc;

use crate::application::handlers::common::{concurrent_change, load_gym, load_trainer, trainer_booking_not_found};
use crate::domain::foundation::{CurrentUser, DomainError, OwnedByUser, TrainerBookingId};
use crate::domain::trainer::TrainerBooking;
use crate::ports::{GymRepository, TrainerBookingRepository, TrainerRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Complete,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct UpdateTrainerSessionCommand {
    pub user: CurrentUser,
    pub booking_id: TrainerBookingId,
    pub action: SessionAction,
}

/// Completion is marked by the trainer or the gym's owner. Cancellation is
/// open to the member who booked and to the trainer. Super-admins can do
/// both.
pub struct UpdateTrainerSessionHandler {
    trainer_bookings: Arc<dyn TrainerBookingRepository>,
    trainers: Arc<dyn TrainerRepository>,
    gyms: Arc<dyn GymRepository>,
}

impl UpdateTrainerSessionHandler {
    pub fn new(
        trainer_bookings: Arc<dyn TrainerBookingRepository>,
        trainers: Arc<dyn TrainerRepository>,
        gyms: Arc<dyn GymRepository>,
    ) -> Self {
        Self {
            trainer_bookings,
            trainers,
            gyms,
        }
    }

    pub async fn handle(&self, cmd: UpdateTrainerSessionCommand) -> Result<TrainerBooking, DomainError> {
        let mut booking = self
            .trainer_bookings
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| trainer_booking_not_found(&cmd.booking_id))?;
        self.authorize(&cmd.user, &booking, cmd.action).await?;

        let expected = booking.status;
        match cmd.action {
            SessionAction::Complete => booking.complete()?,
            SessionAction::Cancel => booking.cancel()?,
        }
        if !self.trainer_bookings.compare_and_update(&booking, expected).await? {
            return Err(concurrent_change("Trainer session"));
        }

        tracing::info!(
            trainer_booking_id = %booking.id,
            status = booking.status.as_str(),
            "Trainer session updated"
        );
        Ok(booking)
    }

    async fn authorize(
        &self,
        user: &CurrentUser,
        booking: &TrainerBooking,
        action: SessionAction,
    ) -> Result<(), DomainError> {
        if user.is_super_admin() {
            return Ok(());
        }
        if action == SessionAction::Cancel && booking.is_owner(&user.id) {
            return Ok(());
        }
        let trainer = load_trainer(self.trainers.as_ref(), &booking.trainer_id).await?;
        if trainer.user_id == user.id {
            return Ok(());
        }
        if action == SessionAction::Complete {
            let gym = load_gym(self.gyms.as_ref(), &booking.gym_id).await?;
            return gym.check_ownership(&user.id);
        }
        Err(DomainError::forbidden("Only the member or the trainer can cancel this session"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::payment::MockPaymentGateway;
    use crate::application::handlers::booking::VerifyPaymentCommand;
    use crate::application::handlers::test_support::{hour, next_week, World};
    use crate::application::handlers::trainer::{
        CreateTrainerBookingCommand, CreateTrainerBookingHandler, VerifyTrainerPaymentHandler,
    };
    use crate::domain::foundation::{ErrorCode, Role};
    use crate::domain::trainer::TrainerBookingStatus;

    struct Fixture {
        world: World,
        owner: CurrentUser,
        coach: CurrentUser,
        member: CurrentUser,
        booking: TrainerBooking,
    }

    async fn paid_session(pay: bool) -> Fixture {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let coach = world.user("arjun", Role::Trainer).await;
        let trainer = world.approved_trainer(&coach, &gym, 500).await;
        let member = world.user("asha", Role::User).await;

        let mut booking = CreateTrainerBookingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
            World::policy(),
        )
        .handle(CreateTrainerBookingCommand {
            user: member.clone(),
            trainer_id: trainer.id,
            date: next_week(),
            start_time: hour(7),
            duration_hours: None,
        })
        .await
        .unwrap()
        .booking;

        if pay {
            let order_id = booking.payment_order_id.clone().unwrap();
            booking = VerifyTrainerPaymentHandler::new(
                world.store.clone(),
                world.store.clone(),
                world.payments.clone(),
                world.notifier(),
                World::policy(),
            )
            .handle(VerifyPaymentCommand {
                user: member.clone(),
                id: booking.id,
                signature: MockPaymentGateway::sign(&order_id, "pay_1"),
                order_id,
                payment_id: "pay_1".to_string(),
            })
            .await
            .unwrap();
        }

        Fixture {
            world,
            owner,
            coach,
            member,
            booking,
        }
    }

    fn handler(world: &World) -> UpdateTrainerSessionHandler {
        UpdateTrainerSessionHandler::new(world.store.clone(), world.store.clone(), world.store.clone())
    }

    #[tokio::test]
    async fn trainer_completes_paid_session() {
        let f = paid_session(true).await;
        let done = handler(&f.world)
            .handle(UpdateTrainerSessionCommand {
                user: f.coach,
                booking_id: f.booking.id,
                action: SessionAction::Complete,
            })
            .await
            .unwrap();
        assert_eq!(done.status, TrainerBookingStatus::Completed);
    }

    #[tokio::test]
    async fn gym_owner_can_complete_but_not_cancel() {
        let f = paid_session(true).await;
        let h = handler(&f.world);
        let err = h
            .handle(UpdateTrainerSessionCommand {
                user: f.owner.clone(),
                booking_id: f.booking.id,
                action: SessionAction::Cancel,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        h.handle(UpdateTrainerSessionCommand {
            user: f.owner,
            booking_id: f.booking.id,
            action: SessionAction::Complete,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn member_cannot_complete() {
        let f = paid_session(true).await;
        let err = handler(&f.world)
            .handle(UpdateTrainerSessionCommand {
                user: f.member,
                booking_id: f.booking.id,
                action: SessionAction::Complete,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn unpaid_session_cannot_complete() {
        let f = paid_session(false).await;
        let err = handler(&f.world)
            .handle(UpdateTrainerSessionCommand {
                user: f.coach,
                booking_id: f.booking.id,
                action: SessionAction::Complete,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn member_cancels_and_completion_is_then_rejected() {
        let f = paid_session(true).await;
        let h = handler(&f.world);
        let cancelled = h
            .handle(UpdateTrainerSessionCommand {
                user: f.member,
                booking_id: f.booking.id,
                action: SessionAction::Cancel,
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status, TrainerBookingStatus::Cancelled);

        assert!(h
            .handle(UpdateTrainerSessionCommand {
                user: f.coach,
                booking_id: f.booking.id,
                action: SessionAction::Complete,
            })
            .await
            .is_err());
    }
}
