use async_trait::async_trait;

use crate::domain::foundation::{
    ApprovalStatus, DomainError, ErrorCode, GymId, ServiceId, SlotId, UserId,
};
use crate::domain::gym::{ensure_no_overlap, Gym, GymService, TimeSlot};
use crate::domain::search::SearchQuery;
use crate::ports::{GymRepository, ServiceRepository, SlotRepository};

use super::{newest_first, InMemoryStore, Tables};

#[async_trait]
impl GymRepository for InMemoryStore {
    async fn insert(&self, gym: &Gym) -> Result<(), DomainError> {
        self.tables().await.gyms.insert(gym.id, gym.clone());
        Ok(())
    }

    async fn update(&self, gym: &Gym) -> Result<(), DomainError> {
        let mut t = self.tables().await;
        let stored = t
            .gyms
            .get_mut(&gym.id)
            .ok_or_else(|| DomainError::new(ErrorCode::GymNotFound, "Gym not found"))?;
        stored.details = gym.details.clone();
        stored.status = gym.status;
        stored.updated_at = gym.updated_at;
        Ok(())
    }

    async fn find_by_id(&self, id: &GymId) -> Result<Option<Gym>, DomainError> {
        Ok(self.tables().await.gyms.get(id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Gym>, DomainError> {
        let mut gyms: Vec<Gym> = self
            .tables()
            .await
            .gyms
            .values()
            .filter(|g| &g.owner_id == owner_id)
            .cloned()
            .collect();
        newest_first(&mut gyms, |g| g.created_at);
        Ok(gyms)
    }

    async fn list_by_status(&self, status: Option<ApprovalStatus>) -> Result<Vec<Gym>, DomainError> {
        let mut gyms: Vec<Gym> = self
            .tables()
            .await
            .gyms
            .values()
            .filter(|g| status.map_or(true, |s| g.status == s))
            .cloned()
            .collect();
        newest_first(&mut gyms, |g| g.created_at);
        Ok(gyms)
    }

    async fn search_candidates(&self, query: &SearchQuery) -> Result<Vec<Gym>, DomainError> {
        Ok(self
            .tables()
            .await
            .gyms
            .values()
            .filter(|g| g.status.is_live() && query.matches_filters(g))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ServiceRepository for InMemoryStore {
    async fn insert(&self, service: &GymService) -> Result<(), DomainError> {
        self.tables().await.services.insert(service.id, service.clone());
        Ok(())
    }

    async fn update(&self, service: &GymService) -> Result<(), DomainError> {
        let mut t = self.tables().await;
        match t.services.get_mut(&service.id) {
            Some(stored) => {
                *stored = service.clone();
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::ServiceNotFound, "Service not found")),
        }
    }

    async fn find_by_id(&self, id: &ServiceId) -> Result<Option<GymService>, DomainError> {
        Ok(self.tables().await.services.get(id).cloned())
    }

    async fn list_by_gym(&self, gym_id: &GymId, active_only: bool) -> Result<Vec<GymService>, DomainError> {
        let mut services: Vec<GymService> = self
            .tables()
            .await
            .services
            .values()
            .filter(|s| &s.gym_id == gym_id && (!active_only || s.is_active))
            .cloned()
            .collect();
        services.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(services)
    }
}

#[async_trait]
impl SlotRepository for InMemoryStore {
    async fn insert_checked(&self, slot: &TimeSlot) -> Result<(), DomainError> {
        let mut t = self.tables().await;
        if !t.gyms.contains_key(&slot.gym_id) {
            return Err(DomainError::new(ErrorCode::GymNotFound, "Gym not found"));
        }
        t.ensure_no_slot_overlap(slot)?;
        t.slots.insert(slot.id, slot.clone());
        Ok(())
    }

    async fn update_checked(&self, slot: &TimeSlot) -> Result<(), DomainError> {
        let mut t = self.tables().await;
        if !t.slots.contains_key(&slot.id) {
            return Err(DomainError::new(ErrorCode::SlotNotFound, "Time slot not found"));
        }
        t.ensure_no_slot_overlap(slot)?;
        t.slots.insert(slot.id, slot.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SlotId) -> Result<Option<TimeSlot>, DomainError> {
        Ok(self.tables().await.slots.get(id).cloned())
    }

    async fn list_by_gym(&self, gym_id: &GymId) -> Result<Vec<TimeSlot>, DomainError> {
        let mut slots: Vec<TimeSlot> = self
            .tables()
            .await
            .slots
            .values()
            .filter(|s| &s.gym_id == gym_id)
            .cloned()
            .collect();
        slots.sort_by_key(|s| (s.day_of_week.value(), s.hours.start.value()));
        Ok(slots)
    }
}

impl Tables {
    fn ensure_no_slot_overlap(&self, slot: &TimeSlot) -> Result<(), DomainError> {
        let same_gym: Vec<TimeSlot> = self
            .slots
            .values()
            .filter(|s| s.gym_id == slot.gym_id)
            .cloned()
            .collect();
        ensure_no_overlap(slot, &same_gym)
    }
}
