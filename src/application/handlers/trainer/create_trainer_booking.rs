//! CreateTrainerBookingHandler - Opens a checkout for a standalone session.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::handlers::booking::CheckoutResult;
use crate::application::handlers::common::{ensure_not_past, load_gym, load_trainer};
use crate::application::CachedSettings;
use crate::domain::booking::CapacityPolicy;
use crate::domain::foundation::{CurrentUser, DomainError, Hour, HourRange, TrainerId};
use crate::domain::trainer::TrainerBooking;
use crate::ports::{GymRepository, OrderRequest, PaymentGateway, TrainerBookingRepository, TrainerRepository};

#[derive(Debug, Clone)]
pub struct CreateTrainerBookingCommand {
    pub user: CurrentUser,
    pub trainer_id: TrainerId,
    pub date: NaiveDate,
    pub start_time: Hour,
    /// Defaults to one hour.
    pub duration_hours: Option<u8>,
}

/// Prices a trainer-only session (gym earns nothing) and reserves the
/// trainer's calendar. Gym slots are not consulted.
pub struct CreateTrainerBookingHandler {
    trainers: Arc<dyn TrainerRepository>,
    gyms: Arc<dyn GymRepository>,
    trainer_bookings: Arc<dyn TrainerBookingRepository>,
    payments: Arc<dyn PaymentGateway>,
    settings: Arc<CachedSettings>,
    policy: CapacityPolicy,
}

impl CreateTrainerBookingHandler {
    pub fn new(
        trainers: Arc<dyn TrainerRepository>,
        gyms: Arc<dyn GymRepository>,
        trainer_bookings: Arc<dyn TrainerBookingRepository>,
        payments: Arc<dyn PaymentGateway>,
        settings: Arc<CachedSettings>,
        policy: CapacityPolicy,
    ) -> Self {
        Self {
            trainers,
            gyms,
            trainer_bookings,
            payments,
            settings,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateTrainerBookingCommand,
    ) -> Result<CheckoutResult<TrainerBooking>, DomainError> {
        ensure_not_past(cmd.date)?;

        let trainer = load_trainer(self.trainers.as_ref(), &cmd.trainer_id).await?;
        trainer.ensure_bookable()?;
        load_gym(self.gyms.as_ref(), &trainer.gym_id).await?.ensure_bookable()?;

        let hours = HourRange::starting_at(cmd.start_time, cmd.duration_hours.unwrap_or(1))?;
        let rate = self.settings.current().await?.commission_rate;
        let mut booking = TrainerBooking::checkout(cmd.user.id, &trainer, cmd.date, hours, rate)?;

        let order = self
            .payments
            .create_order(
                OrderRequest::new(booking.price.total, booking.id.to_string())
                    .with_note("purpose", "trainer_booking")
                    .with_note("trainer_id", trainer.id.to_string()),
            )
            .await?;
        booking.attach_payment_order(&order.id);

        self.trainer_bookings.create_checked(&booking, &self.policy).await?;

        tracing::info!(
            trainer_booking_id = %booking.id,
            trainer_id = %trainer.id,
            total = booking.price.total.minor(),
            order_id = %order.id,
            "Trainer session checkout opened"
        );

        Ok(CheckoutResult {
            booking,
            order,
            key_id: self.payments.key_id().to_string(),
        })
    }
}
