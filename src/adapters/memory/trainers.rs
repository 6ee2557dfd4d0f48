use async_trait::async_trait;

use crate::domain::booking::{CapacityPolicy, PaymentStatus};
use crate::domain::foundation::{
    ApprovalStatus, DomainError, ErrorCode, GymId, Timestamp, TrainerBookingId, TrainerId, UserId,
};
use crate::domain::monetization::PaymentTransaction;
use crate::domain::trainer::{Trainer, TrainerBooking, TrainerBookingStatus};
use crate::ports::{TrainerBookingRepository, TrainerRepository};

use super::{newest_first, InMemoryStore};

fn trainer_not_found() -> DomainError {
    DomainError::new(ErrorCode::TrainerNotFound, "Trainer not found")
}

fn session_not_found() -> DomainError {
    DomainError::new(ErrorCode::TrainerBookingNotFound, "Trainer booking not found")
}

#[async_trait]
impl TrainerRepository for InMemoryStore {
    async fn insert(&self, trainer: &Trainer) -> Result<(), DomainError> {
        let mut t = self.tables().await;
        if t.trainers.values().any(|existing| existing.user_id == trainer.user_id) {
            return Err(DomainError::new(
                ErrorCode::TrainerAlreadyRegistered,
                "User already has a trainer profile",
            ));
        }
        t.trainers.insert(trainer.id, trainer.clone());
        Ok(())
    }

    async fn update(&self, trainer: &Trainer) -> Result<(), DomainError> {
        let mut t = self.tables().await;
        let stored = t.trainers.get_mut(&trainer.id).ok_or_else(trainer_not_found)?;
        stored.profile = trainer.profile.clone();
        stored.status = trainer.status;
        Ok(())
    }

    async fn find_by_id(&self, id: &TrainerId) -> Result<Option<Trainer>, DomainError> {
        Ok(self.tables().await.trainers.get(id).cloned())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Trainer>, DomainError> {
        Ok(self
            .tables()
            .await
            .trainers
            .values()
            .find(|t| &t.user_id == user_id)
            .cloned())
    }

    async fn list_by_gym(
        &self,
        gym_id: &GymId,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<Trainer>, DomainError> {
        let mut trainers: Vec<Trainer> = self
            .tables()
            .await
            .trainers
            .values()
            .filter(|t| &t.gym_id == gym_id && status.map_or(true, |s| t.status == s))
            .cloned()
            .collect();
        newest_first(&mut trainers, |t| t.created_at);
        Ok(trainers)
    }
}

#[async_trait]
impl TrainerBookingRepository for InMemoryStore {
    async fn create_checked(
        &self,
        booking: &TrainerBooking,
        policy: &CapacityPolicy,
    ) -> Result<(), DomainError> {
        let mut t = self.tables().await;
        if !t.trainers.contains_key(&booking.trainer_id) {
            return Err(trainer_not_found());
        }
        let calendar = t.trainer_calendar(&booking.trainer_id, booking.date, booking.id.as_uuid());
        policy.check_trainer_free(booking.hours, &calendar, &Timestamp::now())?;
        t.trainer_bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TrainerBookingId) -> Result<Option<TrainerBooking>, DomainError> {
        Ok(self.tables().await.trainer_bookings.get(id).cloned())
    }

    async fn confirm_payment(
        &self,
        booking: &TrainerBooking,
        transaction: &PaymentTransaction,
        policy: &CapacityPolicy,
    ) -> Result<bool, DomainError> {
        let mut t = self.tables().await;
        let now = Timestamp::now();
        let (paid, created_at) = t
            .trainer_bookings
            .get(&booking.id)
            .map(|b| (b.payment_status == PaymentStatus::Completed, b.created_at))
            .ok_or_else(session_not_found)?;
        if paid {
            return Ok(false);
        }
        if policy.hold_lapsed(&created_at, &now) {
            let calendar = t.trainer_calendar(&booking.trainer_id, booking.date, booking.id.as_uuid());
            policy.check_trainer_free(booking.hours, &calendar, &now)?;
        }

        let stored = t.trainer_bookings.get_mut(&booking.id).ok_or_else(session_not_found)?;
        stored.status = booking.status;
        stored.payment_status = booking.payment_status;
        stored.payment_id = booking.payment_id.clone();
        stored.updated_at = booking.updated_at;
        t.transactions.push(transaction.clone());
        Ok(true)
    }

    async fn compare_and_update(
        &self,
        booking: &TrainerBooking,
        expected_status: TrainerBookingStatus,
    ) -> Result<bool, DomainError> {
        let mut t = self.tables().await;
        let stored = t.trainer_bookings.get_mut(&booking.id).ok_or_else(session_not_found)?;
        if stored.status != expected_status {
            return Ok(false);
        }
        stored.status = booking.status;
        stored.updated_at = booking.updated_at;
        Ok(true)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<TrainerBooking>, DomainError> {
        let mut bookings: Vec<TrainerBooking> = self
            .tables()
            .await
            .trainer_bookings
            .values()
            .filter(|b| &b.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut bookings, |b| b.created_at);
        Ok(bookings)
    }

    async fn list_by_trainer(&self, trainer_id: &TrainerId) -> Result<Vec<TrainerBooking>, DomainError> {
        let mut bookings: Vec<TrainerBooking> = self
            .tables()
            .await
            .trainer_bookings
            .values()
            .filter(|b| &b.trainer_id == trainer_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| (b.date, b.hours.start.value()));
        Ok(bookings)
    }
}
