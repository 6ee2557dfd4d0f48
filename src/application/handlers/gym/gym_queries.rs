//! Read-side gym queries.

use std::sync::Arc;

use crate::application::handlers::common::load_gym;
use crate::domain::foundation::{ApprovalStatus, CurrentUser, DomainError, GymId};
use crate::domain::gym::Gym;
use crate::ports::GymRepository;

pub struct GymQueries {
    gyms: Arc<dyn GymRepository>,
}

impl GymQueries {
    pub fn new(gyms: Arc<dyn GymRepository>) -> Self {
        Self { gyms }
    }

    pub async fn get(&self, id: &GymId) -> Result<Gym, DomainError> {
        load_gym(self.gyms.as_ref(), id).await
    }

    /// Gyms owned by the caller, any status.
    pub async fn mine(&self, user: &CurrentUser) -> Result<Vec<Gym>, DomainError> {
        self.gyms.list_by_owner(&user.id).await
    }

    /// Super-admin moderation queue.
    pub async fn by_status(
        &self,
        user: &CurrentUser,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<Gym>, DomainError> {
        user.require_super_admin()?;
        self.gyms.list_by_status(status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{details, World};
    use crate::domain::foundation::{ErrorCode, Role};

    #[tokio::test]
    async fn status_listing_needs_super_admin() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let pending = Gym::create(owner.id, details("Pulse")).unwrap();
        GymRepository::insert(world.store.as_ref(), &pending).await.unwrap();
        world.approved_gym(&owner).await;
        let queries = GymQueries::new(world.store.clone());

        let err = queries.by_status(&owner, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let admin = world.user("root", Role::SuperAdmin).await;
        let queue = queries
            .by_status(&admin, Some(ApprovalStatus::Pending))
            .await
            .unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queries.mine(&owner).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_gym_not_found() {
        let world = World::new();
        let err = GymQueries::new(world.store.clone())
            .get(&GymId::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::GymNotFound);
    }
}
