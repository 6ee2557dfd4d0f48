//! Weekly time slot handlers.

use std::sync::Arc;

use crate::application::handlers::common::load_gym;
use crate::domain::foundation::{CurrentUser, DomainError, ErrorCode, GymId, OwnedByUser, SlotId};
use crate::domain::gym::{SlotDefinition, TimeSlot};
use crate::ports::{GymRepository, SlotRepository};

#[derive(Debug, Clone)]
pub struct CreateSlotCommand {
    pub user: CurrentUser,
    pub gym_id: GymId,
    pub slot: SlotDefinition,
}

#[derive(Debug, Clone)]
pub struct UpdateSlotCommand {
    pub user: CurrentUser,
    pub gym_id: GymId,
    pub slot_id: SlotId,
    pub slot: SlotDefinition,
}

/// Keeps a gym's active slots non-overlapping per weekday.
pub struct ManageSlotsHandler {
    gyms: Arc<dyn GymRepository>,
    slots: Arc<dyn SlotRepository>,
}

impl ManageSlotsHandler {
    pub fn new(gyms: Arc<dyn GymRepository>, slots: Arc<dyn SlotRepository>) -> Self {
        Self { gyms, slots }
    }

    pub async fn create(&self, cmd: CreateSlotCommand) -> Result<TimeSlot, DomainError> {
        let gym = load_gym(self.gyms.as_ref(), &cmd.gym_id).await?;
        gym.check_owner_or_admin(&cmd.user.id, cmd.user.is_super_admin())?;

        let slot = TimeSlot::create(gym.id, cmd.slot)?;
        self.slots.insert_checked(&slot).await?;
        tracing::info!(gym_id = %gym.id, slot_id = %slot.id, hours = %slot.hours, "Time slot created");
        Ok(slot)
    }

    pub async fn update(&self, cmd: UpdateSlotCommand) -> Result<TimeSlot, DomainError> {
        let gym = load_gym(self.gyms.as_ref(), &cmd.gym_id).await?;
        gym.check_owner_or_admin(&cmd.user.id, cmd.user.is_super_admin())?;

        let mut slot = self
            .slots
            .find_by_id(&cmd.slot_id)
            .await?
            .filter(|s| s.gym_id == gym.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::SlotNotFound, "Time slot not found")
                    .with_detail("slot_id", cmd.slot_id.to_string())
            })?;
        slot.redefine(cmd.slot)?;
        self.slots.update_checked(&slot).await?;
        Ok(slot)
    }

    pub async fn list(&self, gym_id: &GymId) -> Result<Vec<TimeSlot>, DomainError> {
        load_gym(self.gyms.as_ref(), gym_id).await?;
        self.slots.list_by_gym(gym_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{hour, World};
    use crate::domain::foundation::{DayOfWeek, Role};

    fn def(start: u8, end: u8) -> SlotDefinition {
        SlotDefinition {
            day_of_week: DayOfWeek::try_new(1).unwrap(),
            start_time: hour(start),
            end_time: hour(end),
            max_capacity: 25,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn overlapping_slot_rejected_touching_allowed() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let handler = ManageSlotsHandler::new(world.store.clone(), world.store.clone());
        let create = |slot| CreateSlotCommand {
            user: owner.clone(),
            gym_id: gym.id,
            slot,
        };

        handler.create(create(def(6, 10))).await.unwrap();
        let err = handler.create(create(def(9, 12))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotOverlap);
        handler.create(create(def(10, 12))).await.unwrap();

        assert_eq!(handler.list(&gym.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_may_keep_own_range() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let handler = ManageSlotsHandler::new(world.store.clone(), world.store.clone());
        let slot = handler
            .create(CreateSlotCommand {
                user: owner.clone(),
                gym_id: gym.id,
                slot: def(6, 10),
            })
            .await
            .unwrap();

        let mut wider = def(6, 11);
        wider.max_capacity = 40;
        let updated = handler
            .update(UpdateSlotCommand {
                user: owner,
                gym_id: gym.id,
                slot_id: slot.id,
                slot: wider,
            })
            .await
            .unwrap();
        assert_eq!(updated.max_capacity, 40);
        assert_eq!(updated.id, slot.id);
    }
}
