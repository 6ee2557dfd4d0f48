//! Booking aggregate entity.
//!
//! A booking is created at checkout in `pending_payment`, confirmed when
//! the payment signature is verified, and consumed by redemption at the
//! front desk.
//!
//! # Design Decisions
//!
//! - **Split frozen at creation**: `price` is never recomputed
//! - **Money in minor units**: all amounts are integer paise
//! - **Sessions counter**: `None` means unlimited visits until expiry

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    BookingId, CommissionRate, GymId, Hour, HourRange, Money, OwnedByUser, ServiceId,
    StateMachine, Timestamp, TrainerId, UserId,
};
use crate::domain::gym::{GymService, ServiceType};

use super::{BookingError, BookingStatus, Occupancy, PaymentStatus, PriceBreakdown, RedemptionToken};

/// Trainer attached to a session booking, with the rate at checkout time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerRate {
    pub trainer_id: TrainerId,
    pub hourly_rate: Money,
}

/// Everything needed to open a checkout.
#[derive(Debug, Clone)]
pub struct BookingRequest<'a> {
    pub user_id: UserId,
    pub service: &'a GymService,
    pub trainer: Option<TrainerRate>,
    pub date: NaiveDate,
    /// Required for sessions, ignored for passes and memberships.
    pub hours: Option<HourRange>,
    pub commission_rate: CommissionRate,
}

/// Result of a successful redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Redemption {
    pub booking_id: BookingId,
    pub status: BookingStatus,
    pub remaining_sessions: Option<u32>,
}

/// Booking aggregate.
///
/// # Invariants
///
/// - `price.is_balanced()`
/// - `status == Used` exactly when `remaining_sessions == Some(0)`
/// - `hours` is set for sessions and only for sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub gym_id: GymId,
    pub service_id: ServiceId,
    pub service_type: ServiceType,
    pub trainer_id: Option<TrainerId>,
    pub date: NaiveDate,
    pub hours: Option<HourRange>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub price: PriceBreakdown,
    pub remaining_sessions: Option<u32>,
    pub expires_at: Timestamp,
    pub redemption_token: RedemptionToken,
    pub payment_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    /// Opens a checkout: prices the booking and sets its validity window.
    pub fn checkout(req: BookingRequest<'_>) -> Result<Self, BookingError> {
        let service = req.service;
        if !service.is_active {
            return Err(BookingError::validation("service_id", "Service is not available"));
        }

        let (hours, billable_hours, remaining_sessions, expires_at) = match service.service_type {
            ServiceType::Session => {
                let hours = req
                    .hours
                    .ok_or_else(|| BookingError::validation("start_time", "Sessions need a start time"))?;
                // Expiry is UTC wall-clock; see `Timestamp::at`.
                let ends = match hours.end.as_time() {
                    Some(end) => Timestamp::at(req.date, end),
                    None => Timestamp::start_of(req.date).add_days(1),
                };
                (Some(hours), u32::from(hours.duration_hours()), Some(1), ends)
            }
            ServiceType::Pass | ServiceType::Membership => {
                if req.trainer.is_some() {
                    return Err(BookingError::validation(
                        "trainer_id",
                        "Trainers can only be added to sessions",
                    ));
                }
                let days = service.duration_days.ok_or_else(|| {
                    BookingError::validation("service_id", "Service has no duration")
                })?;
                let expires = Timestamp::start_of(req.date).add_days(i64::from(days));
                (None, 1, service.session_count, expires)
            }
        };

        let price = PriceBreakdown::for_gym_booking(
            service.service_type,
            service.price,
            billable_hours,
            req.trainer.map(|t| t.hourly_rate),
            req.commission_rate,
        )?;

        let now = Timestamp::now();
        Ok(Self {
            id: BookingId::new(),
            user_id: req.user_id,
            gym_id: service.gym_id,
            service_id: service.id,
            service_type: service.service_type,
            trainer_id: req.trainer.map(|t| t.trainer_id),
            date: req.date,
            hours,
            status: BookingStatus::PendingPayment,
            payment_status: PaymentStatus::Pending,
            price,
            remaining_sessions,
            expires_at,
            redemption_token: RedemptionToken::generate(),
            payment_order_id: None,
            payment_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn attach_payment_order(&mut self, order_id: impl Into<String>) {
        self.payment_order_id = Some(order_id.into());
    }

    /// Marks the booking paid. Returns `false` if it already was.
    pub fn confirm_payment(&mut self, payment_id: impl Into<String>) -> Result<bool, BookingError> {
        if self.payment_status == PaymentStatus::Completed {
            return Ok(false);
        }
        self.status = self
            .status
            .transition_to(BookingStatus::Confirmed)
            .map_err(|_| BookingError::invalid_state(self.status.as_str(), "confirm"))?;
        self.payment_status = PaymentStatus::Completed;
        self.payment_id = Some(payment_id.into());
        self.updated_at = Timestamp::now();
        Ok(true)
    }

    /// Consumes one visit.
    ///
    /// Used and cancelled bookings are rejected without mutation. A booking
    /// past `expires_at` is moved to `Expired` and rejected; the caller
    /// persists that change.
    pub fn redeem(&mut self, now: &Timestamp) -> Result<Redemption, BookingError> {
        match self.status {
            BookingStatus::Used => return Err(BookingError::AlreadyUsed(self.id)),
            BookingStatus::Cancelled => return Err(BookingError::Cancelled(self.id)),
            BookingStatus::Expired => return Err(BookingError::Expired(self.id)),
            BookingStatus::PendingPayment | BookingStatus::Confirmed => {}
        }
        if self.payment_status != PaymentStatus::Completed {
            return Err(BookingError::PaymentNotCompleted(self.id));
        }
        if now.is_after(&self.expires_at) {
            self.status = BookingStatus::Expired;
            self.updated_at = *now;
            return Err(BookingError::Expired(self.id));
        }

        if let Some(remaining) = self.remaining_sessions {
            let left = remaining.saturating_sub(1);
            self.remaining_sessions = Some(left);
            if left == 0 {
                self.status = BookingStatus::Used;
            }
        }
        self.updated_at = *now;

        Ok(Redemption {
            booking_id: self.id,
            status: self.status,
            remaining_sessions: self.remaining_sessions,
        })
    }

    /// Cancels a confirmed booking.
    pub fn cancel(&mut self) -> Result<(), BookingError> {
        self.status = self
            .status
            .transition_to(BookingStatus::Cancelled)
            .map_err(|_| BookingError::invalid_state(self.status.as_str(), "cancel"))?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// View of this booking for slot and trainer calendar checks.
    pub fn occupancy(&self) -> Option<Occupancy> {
        self.hours.map(|hours| Occupancy {
            hours,
            status: self.status,
            created_at: self.created_at,
        })
    }

    pub fn start_time(&self) -> Option<Hour> {
        self.hours.map(|h| h.start)
    }
}

impl OwnedByUser for Booking {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }
}
