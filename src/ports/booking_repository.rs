//! Booking repository port.
//!
//! # Atomicity
//!
//! `create_checked` is the only way a booking enters storage. It must run
//! the slot capacity check and (when a trainer is attached) the trainer
//! calendar check against a consistent view and insert in the same unit of
//! work, so that two concurrent checkouts for the last place cannot both
//! succeed. The Postgres adapter does this in one transaction with the
//! gym's slot rows and the trainer row locked `FOR UPDATE`.
//!
//! Confirming payment for a checkout whose hold has lapsed repeats the
//! same checks under the same locks.
//!
//! State changes after creation are compare-and-set: the write only lands
//! if the row still has the status (and visit counter) the caller read.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::booking::{Booking, BookingStatus, CapacityPolicy, Occupancy, RedemptionToken};
use crate::domain::foundation::{BookingId, DomainError, GymId, TrainerId, UserId};
use crate::domain::monetization::PaymentTransaction;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Validates capacity and trainer availability, then inserts.
    ///
    /// # Errors
    ///
    /// - `SlotUnavailable` / `SlotFull` from the capacity check
    /// - `TrainerUnavailable` from the trainer calendar check
    /// - `DatabaseError` on persistence failure
    async fn create_checked(&self, booking: &Booking, policy: &CapacityPolicy) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    async fn find_by_token(&self, token: &RedemptionToken) -> Result<Option<Booking>, DomainError>;

    /// Persists a confirmed payment and writes the transaction log row.
    ///
    /// Returns `false` (writing nothing) if the stored booking was already
    /// paid, which makes repeated verification calls harmless.
    ///
    /// A checkout whose payment hold has lapsed no longer counted against
    /// capacity, so it is re-validated like `create_checked` (excluding
    /// itself) before the payment lands.
    ///
    /// # Errors
    ///
    /// - `SlotFull` / `TrainerUnavailable` if the place was taken meanwhile
    async fn confirm_payment(
        &self,
        booking: &Booking,
        transaction: &PaymentTransaction,
        policy: &CapacityPolicy,
    ) -> Result<bool, DomainError>;

    /// Writes `status`, `remaining_sessions` and `updated_at` if the stored
    /// row still has `expected_status` and `expected_remaining`.
    ///
    /// Returns `false` when another request changed the booking first.
    async fn compare_and_update(
        &self,
        booking: &Booking,
        expected_status: BookingStatus,
        expected_remaining: Option<u32>,
    ) -> Result<bool, DomainError>;

    /// Newest first.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Booking>, DomainError>;

    async fn list_by_gym(&self, gym_id: &GymId, date: Option<NaiveDate>) -> Result<Vec<Booking>, DomainError>;

    /// Gym bookings with this trainer attached.
    async fn list_by_trainer(&self, trainer_id: &TrainerId) -> Result<Vec<Booking>, DomainError>;

    /// Hourly bookings of a gym on a date, for availability listings.
    async fn occupancy_for(&self, gym_id: &GymId, date: NaiveDate) -> Result<Vec<Occupancy>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn BookingRepository) {}
    }
}
