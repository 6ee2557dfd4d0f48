//! CreateGymHandler - Lists a new gym awaiting approval.

use std::sync::Arc;

use crate::domain::foundation::{CurrentUser, DomainError, Role};
use crate::domain::gym::{Gym, GymDetails};
use crate::ports::{GymRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct CreateGymCommand {
    pub owner: CurrentUser,
    pub details: GymDetails,
}

/// Creates the gym in `pending` and promotes its creator to gym owner.
pub struct CreateGymHandler {
    gyms: Arc<dyn GymRepository>,
    users: Arc<dyn UserRepository>,
}

impl CreateGymHandler {
    pub fn new(gyms: Arc<dyn GymRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { gyms, users }
    }

    pub async fn handle(&self, cmd: CreateGymCommand) -> Result<Gym, DomainError> {
        let gym = Gym::create(cmd.owner.id, cmd.details)?;
        self.gyms.insert(&gym).await?;

        if let Some(mut user) = self.users.find_by_id(&cmd.owner.id).await? {
            if user.promote_to(Role::GymOwner) {
                self.users.update_role(&user.id, user.role).await?;
            }
        }

        tracing::info!(gym_id = %gym.id, owner_id = %gym.owner_id, "Gym created");
        Ok(gym)
    }
}
