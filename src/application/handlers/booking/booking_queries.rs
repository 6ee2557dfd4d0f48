//! Read-side booking queries for members and gym owners.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::handlers::common::{booking_not_found, load_gym};
use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, CurrentUser, DomainError, GymId, OwnedByUser};
use crate::ports::{BookingRepository, GymRepository};

pub struct BookingQueries {
    bookings: Arc<dyn BookingRepository>,
    gyms: Arc<dyn GymRepository>,
}

impl BookingQueries {
    pub fn new(bookings: Arc<dyn BookingRepository>, gyms: Arc<dyn GymRepository>) -> Self {
        Self { bookings, gyms }
    }

    /// Visible to the member, the gym's owner and super-admins.
    pub async fn get(&self, user: &CurrentUser, id: &BookingId) -> Result<Booking, DomainError> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| booking_not_found(id))?;
        if booking.is_owner(&user.id) || user.is_super_admin() {
            return Ok(booking);
        }
        let gym = load_gym(self.gyms.as_ref(), &booking.gym_id).await?;
        gym.check_ownership(&user.id)?;
        Ok(booking)
    }

    pub async fn mine(&self, user: &CurrentUser) -> Result<Vec<Booking>, DomainError> {
        self.bookings.list_by_user(&user.id).await
    }

    /// Gym owner's booking list, optionally for one date.
    pub async fn for_gym(
        &self,
        user: &CurrentUser,
        gym_id: &GymId,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Booking>, DomainError> {
        let gym = load_gym(self.gyms.as_ref(), gym_id).await?;
        gym.check_owner_or_admin(&user.id, user.is_super_admin())?;
        self.bookings.list_by_gym(gym_id, date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::{CreateBookingCommand, CreateBookingHandler};
    use crate::application::handlers::test_support::{next_week, World};
    use crate::domain::foundation::{ErrorCode, Role};
    use crate::domain::gym::ServiceType;

    #[tokio::test]
    async fn visibility_rules() {
        let world = World::new();
        let owner = world.user("meera", Role::GymOwner).await;
        let gym = world.approved_gym(&owner).await;
        let pass = world.service(&gym, ServiceType::Membership, 1500).await;
        let asha = world.user("asha", Role::User).await;
        let ravi = world.user("ravi", Role::User).await;

        let booking = CreateBookingHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.payments.clone(),
            world.settings.clone(),
            World::policy(),
        )
        .handle(CreateBookingCommand {
            user: asha.clone(),
            service_id: pass.id,
            date: next_week(),
            start_time: None,
            duration_hours: None,
            trainer_id: None,
        })
        .await
        .unwrap()
        .booking;
        assert_eq!(booking.remaining_sessions, None);

        let queries = BookingQueries::new(world.store.clone(), world.store.clone());
        assert!(queries.get(&asha, &booking.id).await.is_ok());
        assert!(queries.get(&owner, &booking.id).await.is_ok());
        assert_eq!(
            queries.get(&ravi, &booking.id).await.unwrap_err().code,
            ErrorCode::Forbidden
        );

        assert_eq!(queries.mine(&asha).await.unwrap().len(), 1);
        assert!(queries.mine(&ravi).await.unwrap().is_empty());
        assert_eq!(queries.for_gym(&owner, &gym.id, None).await.unwrap().len(), 1);
        assert_eq!(
            queries.for_gym(&owner, &gym.id, Some(next_week() + chrono::Duration::days(1))).await.unwrap().len(),
            0
        );
        assert!(queries.for_gym(&ravi, &gym.id, None).await.is_err());
    }
}
