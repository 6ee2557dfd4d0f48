//! Trainer ports.

use async_trait::async_trait;

use crate::domain::booking::CapacityPolicy;
use crate::domain::foundation::{
    ApprovalStatus, DomainError, GymId, TrainerBookingId, TrainerId, UserId,
};
use crate::domain::monetization::PaymentTransaction;
use crate::domain::trainer::{Trainer, TrainerBooking, TrainerBookingStatus};

#[async_trait]
pub trait TrainerRepository: Send + Sync {
    /// # Errors
    ///
    /// - `TrainerAlreadyRegistered` if the user already has a profile
    async fn insert(&self, trainer: &Trainer) -> Result<(), DomainError>;

    /// Writes profile and status.
    async fn update(&self, trainer: &Trainer) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TrainerId) -> Result<Option<Trainer>, DomainError>;

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Trainer>, DomainError>;

    async fn list_by_gym(
        &self,
        gym_id: &GymId,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<Trainer>, DomainError>;
}

/// Direct trainer sessions. Same atomicity contract as
/// [`BookingRepository`](super::BookingRepository): the calendar check and
/// insert happen under the trainer row lock.
#[async_trait]
pub trait TrainerBookingRepository: Send + Sync {
    /// # Errors
    ///
    /// - `TrainerUnavailable` if the range overlaps the trainer's calendar
    async fn create_checked(
        &self,
        booking: &TrainerBooking,
        policy: &CapacityPolicy,
    ) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TrainerBookingId) -> Result<Option<TrainerBooking>, DomainError>;

    /// Returns `false` if the booking was already paid.
    ///
    /// A checkout whose payment hold has lapsed is checked against the
    /// trainer's calendar again under the trainer lock before it is
    /// confirmed.
    ///
    /// # Errors
    ///
    /// - `TrainerUnavailable` if the time was taken while the hold was lapsed
    async fn confirm_payment(
        &self,
        booking: &TrainerBooking,
        transaction: &PaymentTransaction,
        policy: &CapacityPolicy,
    ) -> Result<bool, DomainError>;

    /// Writes the status if the stored row still has `expected_status`.
    async fn compare_and_update(
        &self,
        booking: &TrainerBooking,
        expected_status: TrainerBookingStatus,
    ) -> Result<bool, DomainError>;

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<TrainerBooking>, DomainError>;

    async fn list_by_trainer(&self, trainer_id: &TrainerId) -> Result<Vec<TrainerBooking>, DomainError>;
}
