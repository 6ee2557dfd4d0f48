//! Gym catalog ports: gyms, their services and their weekly time slots.

use async_trait::async_trait;

use crate::domain::foundation::{ApprovalStatus, DomainError, GymId, ServiceId, SlotId, UserId};
use crate::domain::gym::{Gym, GymService, TimeSlot};
use crate::domain::search::SearchQuery;

/// Persistence for the Gym aggregate.
///
/// `rating` and `featured_until` are owned by the review and featured
/// listing repositories; `update` writes details and status only.
#[async_trait]
pub trait GymRepository: Send + Sync {
    async fn insert(&self, gym: &Gym) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `GymNotFound` if the gym does not exist
    async fn update(&self, gym: &Gym) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &GymId) -> Result<Option<Gym>, DomainError>;

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Gym>, DomainError>;

    /// All gyms, or those with `status`. Newest first.
    async fn list_by_status(&self, status: Option<ApprovalStatus>) -> Result<Vec<Gym>, DomainError>;

    /// Approved gyms matching the query's city and text filters.
    ///
    /// Distance filtering and ranking happen in the domain; implementations
    /// may narrow further but must not drop gyms the filters accept.
    async fn search_candidates(&self, query: &SearchQuery) -> Result<Vec<Gym>, DomainError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn insert(&self, service: &GymService) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `ServiceNotFound` if the service does not exist
    async fn update(&self, service: &GymService) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ServiceId) -> Result<Option<GymService>, DomainError>;

    async fn list_by_gym(&self, gym_id: &GymId, active_only: bool) -> Result<Vec<GymService>, DomainError>;
}

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Saves a new slot unless it overlaps another active slot of the same
    /// gym and weekday. The overlap check and the insert are one atomic
    /// step, so two concurrent writes cannot both pass the check.
    ///
    /// # Errors
    ///
    /// - `GymNotFound` if the gym does not exist
    /// - `SlotOverlap` if an active slot of that weekday intersects it
    async fn insert_checked(&self, slot: &TimeSlot) -> Result<(), DomainError>;

    /// Rewrites a slot under the same atomic overlap check as
    /// [`insert_checked`](Self::insert_checked). The slot's own stored row
    /// is ignored by the check.
    ///
    /// # Errors
    ///
    /// - `SlotNotFound` if the slot does not exist
    /// - `SlotOverlap` if another active slot of that weekday intersects it
    async fn update_checked(&self, slot: &TimeSlot) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &SlotId) -> Result<Option<TimeSlot>, DomainError>;

    /// Ordered by day, then start hour.
    async fn list_by_gym(&self, gym_id: &GymId) -> Result<Vec<TimeSlot>, DomainError>;
}
