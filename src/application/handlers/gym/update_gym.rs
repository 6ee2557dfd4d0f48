//! UpdateGymHandler - Owner edits of gym details.

use std::sync::Arc;

use crate::application::handlers::common::load_gym;
use crate::domain::foundation::{CurrentUser, DomainError, GymId, OwnedByUser};
use crate::domain::gym::{Gym, GymDetails};
use crate::ports::GymRepository;

#[derive(Debug, Clone)]
pub struct UpdateGymCommand {
    pub user: CurrentUser,
    pub gym_id: GymId,
    pub details: GymDetails,
}

/// Replaces the descriptive fields. Status, rating and featured window are
/// untouched.
pub struct UpdateGymHandler {
    gyms: Arc<dyn GymRepository>,
}

impl UpdateGymHandler {
    pub fn new(gyms: Arc<dyn GymRepository>) -> Self {
        Self { gyms }
    }

    pub async fn handle(&self, cmd: UpdateGymCommand) -> Result<Gym, DomainError> {
        let mut gym = load_gym(self.gyms.as_ref(), &cmd.gym_id).await?;
        gym.check_owner_or_admin(&cmd.user.id, cmd.user.is_super_admin())?;
        gym.update_details(cmd.details)?;
        self.gyms.update(&gym).await?;
        Ok(gym)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{details, World};
    use crate::domain::foundation::{ErrorCode, Role};

    #[tokio::test]
    async fn owner_can_rename() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;

        let updated = UpdateGymHandler::new(world.store.clone())
            .handle(UpdateGymCommand {
                user: owner,
                gym_id: gym.id,
                details: details("Iron Temple 2"),
            })
            .await
            .unwrap();
        assert_eq!(updated.details.name, "Iron Temple 2");
    }

    #[tokio::test]
    async fn stranger_forbidden() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let other = world.user("ravi", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;

        let err = UpdateGymHandler::new(world.store.clone())
            .handle(UpdateGymCommand {
                user: other,
                gym_id: gym.id,
                details: details("Mine now"),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
