//! Standalone trainer session bookings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::booking::{
    BookingError, BookingStatus, Occupancy, PaymentStatus, PriceBreakdown,
};
use crate::domain::foundation::{
    CommissionRate, GymId, HourRange, OwnedByUser, StateMachine, Timestamp, TrainerBookingId,
    TrainerId, UserId, ValidationError,
};

use super::Trainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrainerBookingStatus {
    #[default]
    PendingPayment,
    Confirmed,
    /// The trainer has delivered the session.
    Completed,
    Cancelled,
}

impl TrainerBookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainerBookingStatus::PendingPayment => "pending_payment",
            TrainerBookingStatus::Confirmed => "confirmed",
            TrainerBookingStatus::Completed => "completed",
            TrainerBookingStatus::Cancelled => "cancelled",
        }
    }

    /// Equivalent gym-booking status, for calendar checks.
    pub fn as_booking_status(&self) -> BookingStatus {
        match self {
            TrainerBookingStatus::PendingPayment => BookingStatus::PendingPayment,
            TrainerBookingStatus::Confirmed => BookingStatus::Confirmed,
            TrainerBookingStatus::Completed => BookingStatus::Used,
            TrainerBookingStatus::Cancelled => BookingStatus::Cancelled,
        }
    }
}

impl StateMachine for TrainerBookingStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TrainerBookingStatus::*;
        match self {
            PendingPayment => vec![Confirmed],
            Confirmed => vec![Completed, Cancelled],
            Completed | Cancelled => vec![],
        }
    }
}

impl fmt::Display for TrainerBookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrainerBookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_payment" => Ok(TrainerBookingStatus::PendingPayment),
            "confirmed" => Ok(TrainerBookingStatus::Confirmed),
            "completed" => Ok(TrainerBookingStatus::Completed),
            "cancelled" => Ok(TrainerBookingStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown trainer booking status '{}'", other),
            )),
        }
    }
}

/// A one-off session with a trainer, priced from the trainer's hourly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerBooking {
    pub id: TrainerBookingId,
    pub user_id: UserId,
    pub trainer_id: TrainerId,
    pub gym_id: GymId,
    pub date: NaiveDate,
    pub hours: HourRange,
    pub status: TrainerBookingStatus,
    pub payment_status: PaymentStatus,
    pub price: PriceBreakdown,
    pub payment_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TrainerBooking {
    pub fn checkout(
        user_id: UserId,
        trainer: &Trainer,
        date: NaiveDate,
        hours: HourRange,
        rate: CommissionRate,
    ) -> Result<Self, ValidationError> {
        let price = PriceBreakdown::for_trainer_session(
            trainer.hourly_rate(),
            u32::from(hours.duration_hours()),
            rate,
        )?;
        let now = Timestamp::now();
        Ok(Self {
            id: TrainerBookingId::new(),
            user_id,
            trainer_id: trainer.id,
            gym_id: trainer.gym_id,
            date,
            hours,
            status: TrainerBookingStatus::PendingPayment,
            payment_status: PaymentStatus::Pending,
            price,
            payment_order_id: None,
            payment_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn attach_payment_order(&mut self, order_id: impl Into<String>) {
        self.payment_order_id = Some(order_id.into());
    }

    /// Marks the session paid. Returns `false` if it already was.
    pub fn confirm_payment(&mut self, payment_id: impl Into<String>) -> Result<bool, BookingError> {
        if self.payment_status == PaymentStatus::Completed {
            return Ok(false);
        }
        self.transition(TrainerBookingStatus::Confirmed, "confirm")?;
        self.payment_status = PaymentStatus::Completed;
        self.payment_id = Some(payment_id.into());
        Ok(true)
    }

    pub fn complete(&mut self) -> Result<(), BookingError> {
        self.transition(TrainerBookingStatus::Completed, "complete")
    }

    pub fn cancel(&mut self) -> Result<(), BookingError> {
        self.transition(TrainerBookingStatus::Cancelled, "cancel")
    }

    fn transition(&mut self, target: TrainerBookingStatus, verb: &str) -> Result<(), BookingError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| BookingError::invalid_state(self.status.as_str(), verb))?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn occupancy(&self) -> Occupancy {
        Occupancy {
            hours: self.hours,
            status: self.status.as_booking_status(),
            created_at: self.created_at,
        }
    }
}

impl OwnedByUser for TrainerBooking {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Hour, Money};
    use crate::domain::trainer::aggregate::tests::profile;

    fn booking() -> TrainerBooking {
        let trainer = Trainer::register(UserId::new(), GymId::new(), profile()).unwrap();
        TrainerBooking::checkout(
            UserId::new(),
            &trainer,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            HourRange::starting_at(Hour::try_new(10).unwrap(), 2).unwrap(),
            CommissionRate::try_from_bps(1000).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn checkout_prices_from_trainer_rate() {
        let b = booking();
        assert_eq!(b.price.total, Money::from_major(1000));
        assert_eq!(b.price.trainer_earnings, Money::from_major(900));
        assert_eq!(b.price.gym_earnings, Money::ZERO);
        assert_eq!(b.status, TrainerBookingStatus::PendingPayment);
    }

    #[test]
    fn complete_requires_payment() {
        let mut b = booking();
        assert!(matches!(b.complete().unwrap_err(), BookingError::InvalidState { .. }));
        assert!(b.confirm_payment("pay_1").unwrap());
        b.complete().unwrap();
        assert_eq!(b.status, TrainerBookingStatus::Completed);
    }

    #[test]
    fn completed_cannot_be_cancelled() {
        let mut b = booking();
        b.confirm_payment("pay_1").unwrap();
        b.complete().unwrap();
        assert!(b.cancel().is_err());
    }

    #[test]
    fn occupancy_maps_completed_to_used() {
        let mut b = booking();
        b.confirm_payment("pay_1").unwrap();
        b.complete().unwrap();
        assert_eq!(b.occupancy().status, BookingStatus::Used);
    }
}
