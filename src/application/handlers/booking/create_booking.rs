//! CreateBookingHandler - Opens a gym checkout.
//!
//! 1. Load service and gym; both must be live
//! 2. Resolve the optional trainer and its rate
//! 3. Price the booking at the current commission rate
//! 4. Create the gateway order for the total
//! 5. Insert with the capacity and trainer checks in one transaction

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::handlers::common::{ensure_not_past, load_gym, load_service, load_trainer};
use crate::application::CachedSettings;
use crate::domain::booking::{Booking, BookingRequest, CapacityPolicy, TrainerRate};
use crate::domain::foundation::{CurrentUser, DomainError, Hour, HourRange, ServiceId, TrainerId};
use crate::domain::gym::ServiceType;
use crate::ports::{
    BookingRepository, GymRepository, OrderRequest, PaymentGateway, PaymentOrder, ServiceRepository,
    TrainerRepository,
};

#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub user: CurrentUser,
    pub service_id: ServiceId,
    pub date: NaiveDate,
    /// Sessions only.
    pub start_time: Option<Hour>,
    /// Sessions only; defaults to one hour.
    pub duration_hours: Option<u8>,
    pub trainer_id: Option<TrainerId>,
}

/// What the client needs to open the hosted checkout.
#[derive(Debug, Clone)]
pub struct CheckoutResult<T> {
    pub booking: T,
    pub order: PaymentOrder,
    pub key_id: String,
}

pub struct CreateBookingHandler {
    gyms: Arc<dyn GymRepository>,
    services: Arc<dyn ServiceRepository>,
    trainers: Arc<dyn TrainerRepository>,
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentGateway>,
    settings: Arc<CachedSettings>,
    policy: CapacityPolicy,
}

impl CreateBookingHandler {
    pub fn new(
        gyms: Arc<dyn GymRepository>,
        services: Arc<dyn ServiceRepository>,
        trainers: Arc<dyn TrainerRepository>,
        bookings: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentGateway>,
        settings: Arc<CachedSettings>,
        policy: CapacityPolicy,
    ) -> Self {
        Self {
            gyms,
            services,
            trainers,
            bookings,
            payments,
            settings,
            policy,
        }
    }

    pub async fn handle(&self, cmd: CreateBookingCommand) -> Result<CheckoutResult<Booking>, DomainError> {
        ensure_not_past(cmd.date)?;

        let service = load_service(self.services.as_ref(), &cmd.service_id).await?;
        let gym = load_gym(self.gyms.as_ref(), &service.gym_id).await?;
        gym.ensure_bookable()?;

        let hours = match (service.service_type, cmd.start_time) {
            (ServiceType::Session, Some(start)) => {
                Some(HourRange::starting_at(start, cmd.duration_hours.unwrap_or(1))?)
            }
            _ => None,
        };

        let trainer = match cmd.trainer_id {
            Some(id) => {
                let trainer = load_trainer(self.trainers.as_ref(), &id).await?;
                trainer.ensure_bookable()?;
                if trainer.gym_id != gym.id {
                    return Err(DomainError::validation("trainer_id", "Trainer does not work at this gym"));
                }
                Some(TrainerRate {
                    trainer_id: trainer.id,
                    hourly_rate: trainer.hourly_rate(),
                })
            }
            None => None,
        };

        let settings = self.settings.current().await?;
        let mut booking = Booking::checkout(BookingRequest {
            user_id: cmd.user.id,
            service: &service,
            trainer,
            date: cmd.date,
            hours,
            commission_rate: settings.commission_rate,
        })?;

        let order = self
            .payments
            .create_order(
                OrderRequest::new(booking.price.total, booking.id.to_string())
                    .with_note("purpose", "booking")
                    .with_note("gym_id", gym.id.to_string()),
            )
            .await?;
        booking.attach_payment_order(&order.id);

        self.bookings.create_checked(&booking, &self.policy).await?;

        tracing::info!(
            booking_id = %booking.id,
            gym_id = %gym.id,
            kind = %booking.service_type,
            total = booking.price.total.minor(),
            order_id = %order.id,
            "Booking checkout opened"
        );

        Ok(CheckoutResult {
            booking,
            order,
            key_id: self.payments.key_id().to_string(),
        })
    }
}
