//! Read-side trainer queries: profiles, gym rosters and calendars.

use std::sync::Arc;

use serde::Serialize;

use crate::application::handlers::common::load_gym;
use crate::domain::booking::Booking;
use crate::domain::foundation::{ApprovalStatus, CurrentUser, DomainError, ErrorCode, GymId, OwnedByUser};
use crate::domain::trainer::{Trainer, TrainerBooking};
use crate::ports::{BookingRepository, GymRepository, TrainerBookingRepository, TrainerRepository};

/// A trainer's full calendar: standalone sessions plus gym bookings they
/// were attached to.
#[derive(Debug, Clone, Serialize)]
pub struct TrainerSchedule {
    pub trainer: Trainer,
    pub sessions: Vec<TrainerBooking>,
    pub gym_bookings: Vec<Booking>,
}

pub struct TrainerQueries {
    trainers: Arc<dyn TrainerRepository>,
    trainer_bookings: Arc<dyn TrainerBookingRepository>,
    bookings: Arc<dyn BookingRepository>,
    gyms: Arc<dyn GymRepository>,
}

impl TrainerQueries {
    pub fn new(
        trainers: Arc<dyn TrainerRepository>,
        trainer_bookings: Arc<dyn TrainerBookingRepository>,
        bookings: Arc<dyn BookingRepository>,
        gyms: Arc<dyn GymRepository>,
    ) -> Self {
        Self {
            trainers,
            trainer_bookings,
            bookings,
            gyms,
        }
    }

    /// The caller's own trainer profile.
    pub async fn me(&self, user: &CurrentUser) -> Result<Trainer, DomainError> {
        self.trainers
            .find_by_user(&user.id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::TrainerNotFound, "No trainer profile for this account"))
    }

    /// Public roster: approved trainers only.
    pub async fn approved_at_gym(&self, gym_id: &GymId) -> Result<Vec<Trainer>, DomainError> {
        self.trainers.list_by_gym(gym_id, Some(ApprovalStatus::Approved)).await
    }

    /// Owner roster including pending applications.
    pub async fn for_gym(&self, user: &CurrentUser, gym_id: &GymId) -> Result<Vec<Trainer>, DomainError> {
        let gym = load_gym(self.gyms.as_ref(), gym_id).await?;
        gym.check_owner_or_admin(&user.id, user.is_super_admin())?;
        self.trainers.list_by_gym(gym_id, None).await
    }

    /// Sessions the caller booked as a member.
    pub async fn my_sessions(&self, user: &CurrentUser) -> Result<Vec<TrainerBooking>, DomainError> {
        self.trainer_bookings.list_by_user(&user.id).await
    }

    pub async fn schedule(&self, user: &CurrentUser) -> Result<TrainerSchedule, DomainError> {
        let trainer = self.me(user).await?;
        let sessions = self.trainer_bookings.list_by_trainer(&trainer.id).await?;
        let gym_bookings = self.bookings.list_by_trainer(&trainer.id).await?;
        Ok(TrainerSchedule {
            trainer,
            sessions,
            gym_bookings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::{CreateBookingCommand, CreateBookingHandler};
    use crate::application::handlers::test_support::{hour, next_week, World};
    use crate::application::handlers::trainer::{CreateTrainerBookingCommand, CreateTrainerBookingHandler};
    use crate::domain::foundation::Role;
    use crate::domain::gym::ServiceType;

    fn queries(world: &World) -> TrainerQueries {
        TrainerQueries::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
        )
    }

    #[tokio::test]
    async fn schedule_merges_both_calendars() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let service = world.service(&gym, ServiceType::Session, 300).await;
        let date = next_week();
        world.slot(&gym, date, 6, 10, 5).await;
        let coach = world.user("arjun", Role::Trainer).await;
        let trainer = world.approved_trainer(&coach, &gym, 500).await;
        let asha = world.user("asha", Role::User).await;

        CreateBookingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
            World::policy(),
        )
        .handle(CreateBookingCommand {
            user: asha.clone(),
            service_id: service.id,
            date,
            start_time: Some(hour(6)),
            duration_hours: Some(1),
            trainer_id: Some(trainer.id),
        })
        .await
        .unwrap();
        CreateTrainerBookingHandler::new(
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
            date,
            start_time: hour(8),
            duration_hours: None,
        })
        .await
        .unwrap();

        let schedule = queries(&world).schedule(&coach).await.unwrap();
        assert_eq!(schedule.trainer.id, trainer.id);
        assert_eq!(schedule.sessions.len(), 1);
        assert_eq!(schedule.gym_bookings.len(), 1);
        assert_eq!(queries(&world).my_sessions(&asha).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn public_roster_hides_rejected() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let coach = world.user("arjun", Role::Trainer).await;
        let mut trainer = world.approved_trainer(&coach, &gym, 500).await;
        trainer.reject().unwrap();
        TrainerRepository::update(world.store.as_ref(), &trainer).await.unwrap();

        let q = queries(&world);
        assert!(q.approved_at_gym(&gym.id).await.unwrap().is_empty());
        assert_eq!(q.for_gym(&owner, &gym.id).await.unwrap().len(), 1);

        let stranger = world.user("ravi", Role::User).await;
        assert!(q.for_gym(&stranger, &gym.id).await.is_err());
        assert_eq!(q.me(&stranger).await.unwrap_err().code, ErrorCode::TrainerNotFound);
    }
}
