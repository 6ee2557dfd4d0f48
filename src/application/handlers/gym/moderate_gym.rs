//! ModerateGymHandler - Super-admin approval and rejection of gyms.

use std::sync::Arc;

use crate::application::handlers::common::load_gym;
use crate::application::Notifier;
use crate::domain::foundation::{CurrentUser, DomainError, GymId};
use crate::domain::gym::Gym;
use crate::ports::{GymRepository, UserRepository};

/// Moderation outcome, shared by gym and trainer moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moderation {
    Approve,
    Reject,
}

#[derive(Debug, Clone)]
pub struct ModerateGymCommand {
    pub user: CurrentUser,
    pub gym_id: GymId,
    pub decision: Moderation,
}

pub struct ModerateGymHandler {
    gyms: Arc<dyn GymRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Notifier,
}

impl ModerateGymHandler {
    pub fn new(gyms: Arc<dyn GymRepository>, users: Arc<dyn UserRepository>, notifier: Notifier) -> Self {
        Self { gyms, users, notifier }
    }

    pub async fn handle(&self, cmd: ModerateGymCommand) -> Result<Gym, DomainError> {
        cmd.user.require_super_admin()?;

        let mut gym = load_gym(self.gyms.as_ref(), &cmd.gym_id).await?;
        match cmd.decision {
            Moderation::Approve => gym.approve()?,
            Moderation::Reject => gym.reject()?,
        }
        self.gyms.update(&gym).await?;
        tracing::info!(gym_id = %gym.id, status = %gym.status, "Gym moderated");

        if let Some(owner) = self.users.find_by_id(&gym.owner_id).await? {
            self.notifier
                .approval_changed(&owner.email, "gym", &gym.details.name, gym.status);
        }
        Ok(gym)
    }
}
