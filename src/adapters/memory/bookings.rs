use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::booking::{
    Booking, BookingStatus, CapacityPolicy, Occupancy, PaymentStatus, RedemptionToken,
};
use crate::domain::foundation::{
    BookingId, DayOfWeek, DomainError, ErrorCode, GymId, Timestamp, TrainerId, UserId,
};
use crate::domain::gym::TimeSlot;
use crate::domain::monetization::PaymentTransaction;
use crate::ports::BookingRepository;

use super::{newest_first, InMemoryStore, Tables};

fn booking_not_found() -> DomainError {
    DomainError::new(ErrorCode::BookingNotFound, "Booking not found")
}

impl Tables {
    /// Slot capacity and trainer calendar for `booking`, ignoring any stored
    /// copy of the booking itself.
    fn check_capacity(
        &self,
        booking: &Booking,
        policy: &CapacityPolicy,
        now: &Timestamp,
    ) -> Result<(), DomainError> {
        let Some(hours) = booking.hours else {
            return Ok(());
        };
        let day = DayOfWeek::of(booking.date);
        let slots: Vec<TimeSlot> = self
            .slots
            .values()
            .filter(|s| s.gym_id == booking.gym_id && s.day_of_week == day && s.is_active)
            .cloned()
            .collect();
        let existing: Vec<Occupancy> = self
            .bookings
            .values()
            .filter(|b| b.gym_id == booking.gym_id && b.date == booking.date && b.id != booking.id)
            .filter_map(Booking::occupancy)
            .collect();
        policy.check_slot_capacity(day, hours, &slots, &existing, now)?;

        if let Some(trainer_id) = booking.trainer_id {
            let calendar = self.trainer_calendar(&trainer_id, booking.date, booking.id.as_uuid());
            policy.check_trainer_free(hours, &calendar, now)?;
        }
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create_checked(&self, booking: &Booking, policy: &CapacityPolicy) -> Result<(), DomainError> {
        let mut t = self.tables().await;
        t.check_capacity(booking, policy, &Timestamp::now())?;
        t.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self.tables().await.bookings.get(id).cloned())
    }

    async fn find_by_token(&self, token: &RedemptionToken) -> Result<Option<Booking>, DomainError> {
        Ok(self
            .tables()
            .await
            .bookings
            .values()
            .find(|b| &b.redemption_token == token)
            .cloned())
    }

    async fn confirm_payment(
        &self,
        booking: &Booking,
        transaction: &PaymentTransaction,
        policy: &CapacityPolicy,
    ) -> Result<bool, DomainError> {
        let mut t = self.tables().await;
        let now = Timestamp::now();
        let (paid, created_at) = t
            .bookings
            .get(&booking.id)
            .map(|b| (b.payment_status == PaymentStatus::Completed, b.created_at))
            .ok_or_else(booking_not_found)?;
        if paid {
            return Ok(false);
        }
        if policy.hold_lapsed(&created_at, &now) {
            t.check_capacity(booking, policy, &now)?;
        }

        let stored = t.bookings.get_mut(&booking.id).ok_or_else(booking_not_found)?;
        stored.status = booking.status;
        stored.payment_status = booking.payment_status;
        stored.payment_id = booking.payment_id.clone();
        stored.updated_at = booking.updated_at;
        t.transactions.push(transaction.clone());
        Ok(true)
    }

    async fn compare_and_update(
        &self,
        booking: &Booking,
        expected_status: BookingStatus,
        expected_remaining: Option<u32>,
    ) -> Result<bool, DomainError> {
        let mut t = self.tables().await;
        let stored = t
            .bookings
            .get_mut(&booking.id)
            .ok_or_else(booking_not_found)?;
        if stored.status != expected_status || stored.remaining_sessions != expected_remaining {
            return Ok(false);
        }
        stored.status = booking.status;
        stored.remaining_sessions = booking.remaining_sessions;
        stored.updated_at = booking.updated_at;
        Ok(true)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Booking>, DomainError> {
        let mut bookings: Vec<Booking> = self
            .tables()
            .await
            .bookings
            .values()
            .filter(|b| &b.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut bookings, |b| b.created_at);
        Ok(bookings)
    }

    async fn list_by_gym(&self, gym_id: &GymId, date: Option<NaiveDate>) -> Result<Vec<Booking>, DomainError> {
        let mut bookings: Vec<Booking> = self
            .tables()
            .await
            .bookings
            .values()
            .filter(|b| &b.gym_id == gym_id && date.map_or(true, |d| b.date == d))
            .cloned()
            .collect();
        newest_first(&mut bookings, |b| b.created_at);
        Ok(bookings)
    }

    async fn list_by_trainer(&self, trainer_id: &TrainerId) -> Result<Vec<Booking>, DomainError> {
        let mut bookings: Vec<Booking> = self
            .tables()
            .await
            .bookings
            .values()
            .filter(|b| b.trainer_id.as_ref() == Some(trainer_id))
            .cloned()
            .collect();
        newest_first(&mut bookings, |b| b.created_at);
        Ok(bookings)
    }

    async fn occupancy_for(&self, gym_id: &GymId, date: NaiveDate) -> Result<Vec<Occupancy>, DomainError> {
        Ok(self
            .tables()
            .await
            .bookings
            .values()
            .filter(|b| &b.gym_id == gym_id && b.date == date)
            .filter_map(Booking::occupancy)
            .collect())
    }
}
