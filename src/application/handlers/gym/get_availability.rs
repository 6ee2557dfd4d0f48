//! GetAvailabilityHandler - Remaining places per hour for a gym and date.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::application::handlers::common::load_gym;
use crate::domain::booking::CapacityPolicy;
use crate::domain::foundation::{DayOfWeek, DomainError, GymId, Hour, HourRange, SlotId, Timestamp};
use crate::ports::{BookingRepository, GymRepository, SlotRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourAvailability {
    pub hour: Hour,
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotAvailability {
    pub slot_id: SlotId,
    pub hours: HourRange,
    pub max_capacity: u32,
    pub by_hour: Vec<HourAvailability>,
}

/// Uses the same holding rule as the booking capacity check, so a listed
/// free place is one a checkout would get.
pub struct GetAvailabilityHandler {
    gyms: Arc<dyn GymRepository>,
    slots: Arc<dyn SlotRepository>,
    bookings: Arc<dyn BookingRepository>,
    policy: CapacityPolicy,
}

impl GetAvailabilityHandler {
    pub fn new(
        gyms: Arc<dyn GymRepository>,
        slots: Arc<dyn SlotRepository>,
        bookings: Arc<dyn BookingRepository>,
        policy: CapacityPolicy,
    ) -> Self {
        Self {
            gyms,
            slots,
            bookings,
            policy,
        }
    }

    pub async fn handle(&self, gym_id: &GymId, date: NaiveDate) -> Result<Vec<SlotAvailability>, DomainError> {
        let gym = load_gym(self.gyms.as_ref(), gym_id).await?;
        let day = DayOfWeek::of(date);

        let mut slots: Vec<_> = self
            .slots
            .list_by_gym(&gym.id)
            .await?
            .into_iter()
            .filter(|s| s.is_active && s.day_of_week == day)
            .collect();
        slots.sort_by_key(|s| s.hours.start);

        let occupancy = self.bookings.occupancy_for(&gym.id, date).await?;
        let now = Timestamp::now();

        Ok(slots
            .iter()
            .map(|slot| SlotAvailability {
                slot_id: slot.id,
                hours: slot.hours,
                max_capacity: slot.max_capacity,
                by_hour: self
                    .policy
                    .remaining_by_hour(slot, &occupancy, &now)
                    .into_iter()
                    .map(|(hour, remaining)| HourAvailability { hour, remaining })
                    .collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::{CreateBookingCommand, CreateBookingHandler};
    use crate::application::handlers::test_support::{hour, next_week, World};
    use crate::domain::foundation::Role;
    use crate::domain::gym::ServiceType;

    #[tokio::test]
    async fn pending_checkout_reduces_remaining() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let service = world.service(&gym, ServiceType::Session, 300).await;
        let date = next_week();
        world.slot(&gym, date, 17, 19, 3).await;

        let booker = CreateBookingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
            World::policy(),
        );
        let asha = world.user("asha", Role::User).await;
        booker
            .handle(CreateBookingCommand {
                user: asha,
                service_id: service.id,
                date,
                start_time: Some(hour(18)),
                duration_hours: Some(1),
                trainer_id: None,
            })
            .await
            .unwrap();

        let handler = GetAvailabilityHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            World::policy(),
        );
        let slots = handler.handle(&gym.id, date).await.unwrap();
        assert_eq!(slots.len(), 1);
        let remaining: Vec<u32> = slots[0].by_hour.iter().map(|h| h.remaining).collect();
        assert_eq!(remaining, vec![3, 2]);
    }

    #[tokio::test]
    async fn other_weekdays_are_empty() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let date = next_week();
        world.slot(&gym, date, 6, 9, 10).await;

        let handler = GetAvailabilityHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            World::policy(),
        );
        let next_day = date + chrono::Duration::days(1);
        assert!(handler.handle(&gym.id, next_day).await.unwrap().is_empty());
    }
}
