//! Service catalog handlers: create, edit and list a gym's services.

use std::sync::Arc;

use crate::application::handlers::common::{load_gym, load_service};
use crate::domain::foundation::{CurrentUser, DomainError, ErrorCode, GymId, OwnedByUser, ServiceId};
use crate::domain::gym::{GymService, NewService, ServiceUpdate};
use crate::ports::{GymRepository, ServiceRepository};

#[derive(Debug, Clone)]
pub struct CreateServiceCommand {
    pub user: CurrentUser,
    pub gym_id: GymId,
    pub service: NewService,
}

#[derive(Debug, Clone)]
pub struct UpdateServiceCommand {
    pub user: CurrentUser,
    pub gym_id: GymId,
    pub service_id: ServiceId,
    pub update: ServiceUpdate,
}

/// Owner-side service management. Existing bookings keep the price frozen
/// at their checkout, so edits only affect future bookings.
pub struct ManageServicesHandler {
    gyms: Arc<dyn GymRepository>,
    services: Arc<dyn ServiceRepository>,
}

impl ManageServicesHandler {
    pub fn new(gyms: Arc<dyn GymRepository>, services: Arc<dyn ServiceRepository>) -> Self {
        Self { gyms, services }
    }

    pub async fn create(&self, cmd: CreateServiceCommand) -> Result<GymService, DomainError> {
        let gym = load_gym(self.gyms.as_ref(), &cmd.gym_id).await?;
        gym.check_owner_or_admin(&cmd.user.id, cmd.user.is_super_admin())?;

        let service = GymService::create(gym.id, cmd.service)?;
        self.services.insert(&service).await?;
        tracing::info!(gym_id = %gym.id, service_id = %service.id, kind = %service.service_type, "Service created");
        Ok(service)
    }

    pub async fn update(&self, cmd: UpdateServiceCommand) -> Result<GymService, DomainError> {
        let gym = load_gym(self.gyms.as_ref(), &cmd.gym_id).await?;
        gym.check_owner_or_admin(&cmd.user.id, cmd.user.is_super_admin())?;

        let mut service = load_service(self.services.as_ref(), &cmd.service_id).await?;
        if service.gym_id != gym.id {
            return Err(DomainError::new(ErrorCode::ServiceNotFound, "Service not found")
                .with_detail("service_id", cmd.service_id.to_string()));
        }
        service.apply_update(cmd.update)?;
        self.services.update(&service).await?;
        Ok(service)
    }

    /// Active services only; the public catalog.
    pub async fn list(&self, gym_id: &GymId) -> Result<Vec<GymService>, DomainError> {
        load_gym(self.gyms.as_ref(), gym_id).await?;
        self.services.list_by_gym(gym_id, true).await
    }
}
