//! RegisterTrainerHandler - A user applies to train at a gym.

use std::sync::Arc;

use crate::application::handlers::common::load_gym;
use crate::domain::foundation::{CurrentUser, DomainError, GymId, Role};
use crate::domain::trainer::{Trainer, TrainerProfile};
use crate::ports::{GymRepository, TrainerRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct RegisterTrainerCommand {
    pub user: CurrentUser,
    pub gym_id: GymId,
    pub profile: TrainerProfile,
}

/// Creates a `pending` trainer profile at an approved gym. One profile per
/// user; the gym owner approves it.
pub struct RegisterTrainerHandler {
    trainers: Arc<dyn TrainerRepository>,
    gyms: Arc<dyn GymRepository>,
    users: Arc<dyn UserRepository>,
}

impl RegisterTrainerHandler {
    pub fn new(
        trainers: Arc<dyn TrainerRepository>,
        gyms: Arc<dyn GymRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { trainers, gyms, users }
    }

    pub async fn handle(&self, cmd: RegisterTrainerCommand) -> Result<Trainer, DomainError> {
        let gym = load_gym(self.gyms.as_ref(), &cmd.gym_id).await?;
        gym.ensure_bookable()?;

        let trainer = Trainer::register(cmd.user.id, gym.id, cmd.profile)?;
        self.trainers.insert(&trainer).await?;

        if let Some(mut user) = self.users.find_by_id(&cmd.user.id).await? {
            if user.promote_to(Role::Trainer) {
                self.users.update_role(&user.id, user.role).await?;
            }
        }

        tracing::info!(trainer_id = %trainer.id, gym_id = %gym.id, "Trainer registered");
        Ok(trainer)
    }
}
