//! ModerateTrainerHandler - Gym owner approval of trainer applications.

use std::sync::Arc;

use crate::application::handlers::common::{load_gym, load_trainer};
use crate::application::handlers::gym::Moderation;
use crate::application::Notifier;
use crate::domain::foundation::{CurrentUser, DomainError, OwnedByUser, TrainerId};
use crate::domain::trainer::Trainer;
use crate::ports::{GymRepository, TrainerRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct ModerateTrainerCommand {
    pub user: CurrentUser,
    pub trainer_id: TrainerId,
    pub decision: Moderation,
}

pub struct ModerateTrainerHandler {
    trainers: Arc<dyn TrainerRepository>,
    gyms: Arc<dyn GymRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Notifier,
}

impl ModerateTrainerHandler {
    pub fn new(
        trainers: Arc<dyn TrainerRepository>,
        gyms: Arc<dyn GymRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            trainers,
            gyms,
            users,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: ModerateTrainerCommand) -> Result<Trainer, DomainError> {
        let mut trainer = load_trainer(self.trainers.as_ref(), &cmd.trainer_id).await?;
        let gym = load_gym(self.gyms.as_ref(), &trainer.gym_id).await?;
        gym.check_owner_or_admin(&cmd.user.id, cmd.user.is_super_admin())?;

        match cmd.decision {
            Moderation::Approve => trainer.approve()?,
            Moderation::Reject => trainer.reject()?,
        }
        self.trainers.update(&trainer).await?;
        tracing::info!(trainer_id = %trainer.id, status = %trainer.status, "Trainer moderated");

        if let Some(account) = self.users.find_by_id(&trainer.user_id).await? {
            self.notifier.approval_changed(
                &account.email,
                "trainer",
                &trainer.profile.display_name,
                trainer.status,
            );
        }
        Ok(trainer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::trainer::{RegisterTrainerCommand, RegisterTrainerHandler};
    use crate::application::handlers::test_support::World;
    use crate::domain::foundation::{ApprovalStatus, ErrorCode, Money, Role};
    use crate::domain::trainer::TrainerProfile;

    async fn applicant(world: &World, owner: &CurrentUser) -> Trainer {
        let gym = world.approved_gym(owner).await;
        let arjun = world.user("arjun", Role::User).await;
        RegisterTrainerHandler::new(world.store.clone(), world.store.clone(), world.store.clone())
            .handle(RegisterTrainerCommand {
                user: arjun,
                gym_id: gym.id,
                profile: TrainerProfile {
                    display_name: "Arjun".to_string(),
                    bio: String::new(),
                    specialties: vec![],
                    hourly_rate: Money::from_major(500),
                },
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn gym_owner_approves_own_trainer() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let trainer = applicant(&world, &owner).await;
        let handler = ModerateTrainerHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.notifier(),
        );

        let approved = handler
            .handle(ModerateTrainerCommand {
                user: owner,
                trainer_id: trainer.id,
                decision: Moderation::Approve,
            })
            .await
            .unwrap();
        assert_eq!(approved.status, ApprovalStatus::Approved);
        assert!(approved.ensure_bookable().is_ok());
    }

    #[tokio::test]
    async fn other_gym_owner_forbidden() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let rival = world.user("ravi", Role::GymOwner).await;
        let trainer = applicant(&world, &owner).await;
        let handler = ModerateTrainerHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.notifier(),
        );

        let err = handler
            .handle(ModerateTrainerCommand {
                user: rival,
                trainer_id: trainer.id,
                decision: Moderation::Reject,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
