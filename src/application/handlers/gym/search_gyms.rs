//! SearchGymsHandler - Two-phase geo search over approved gyms.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::gym::GeoPoint;
use crate::domain::search::{two_phase_search, SearchOutcome, SearchQuery};
use crate::ports::GymRepository;

/// Raw search parameters; all optional.
#[derive(Debug, Clone, Default)]
pub struct SearchGymsQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
    pub city: Option<String>,
    pub text: Option<String>,
}

pub struct SearchGymsHandler {
    gyms: Arc<dyn GymRepository>,
    default_radius_km: f64,
    fallback_limit: u32,
}

impl SearchGymsHandler {
    pub fn new(gyms: Arc<dyn GymRepository>, default_radius_km: f64, fallback_limit: u32) -> Self {
        Self {
            gyms,
            default_radius_km,
            fallback_limit,
        }
    }

    pub async fn handle(&self, query: SearchGymsQuery) -> Result<SearchOutcome, DomainError> {
        let center = match (query.latitude, query.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::try_new(lat, lng)?),
            (None, None) => None,
            _ => {
                return Err(DomainError::validation(
                    "lat",
                    "Latitude and longitude must be given together",
                ))
            }
        };
        let query = SearchQuery::new(
            center,
            query.radius_km.unwrap_or(self.default_radius_km),
            query.city,
            query.text,
            self.fallback_limit,
        )?;

        let candidates = self.gyms.search_candidates(&query).await?;
        let outcome = two_phase_search(&query, candidates, &Timestamp::now());
        tracing::debug!(
            results = outcome.hits().len(),
            expanded = outcome.is_expanded(),
            "Gym search"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{details, World};
    use crate::domain::foundation::{ErrorCode, Role};
    use crate::domain::gym::Gym;

    async fn gym_at(world: &World, name: &str, lat: f64, lng: f64) -> Gym {
        let owner = world.user("meera", Role::GymOwner).await;
        let mut d = details(name);
        d.location = GeoPoint::try_new(lat, lng).unwrap();
        let mut gym = Gym::create(owner.id, d).unwrap();
        gym.approve().unwrap();
        GymRepository::insert(world.store.as_ref(), &gym).await.unwrap();
        gym
    }

    #[tokio::test]
    async fn nearby_gym_found_exactly() {
        let world = World::new();
        gym_at(&world, "Near", 12.97, 77.59).await;
        gym_at(&world, "Far", 19.07, 72.87).await;
        let handler = SearchGymsHandler::new(world.store.clone(), 10.0, 10);

        let outcome = handler
            .handle(SearchGymsQuery {
                latitude: Some(12.98),
                longitude: Some(77.60),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!outcome.is_expanded());
        assert_eq!(outcome.hits().len(), 1);
        assert_eq!(outcome.hits()[0].gym.details.name, "Near");
    }

    #[tokio::test]
    async fn nothing_in_radius_expands() {
        let world = World::new();
        gym_at(&world, "Far", 19.07, 72.87).await;
        let handler = SearchGymsHandler::new(world.store.clone(), 10.0, 10);

        let outcome = handler
            .handle(SearchGymsQuery {
                latitude: Some(12.98),
                longitude: Some(77.60),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(outcome.is_expanded());
        assert_eq!(outcome.hits().len(), 1);
    }

    #[tokio::test]
    async fn half_a_coordinate_is_rejected() {
        let world = World::new();
        let handler = SearchGymsHandler::new(world.store.clone(), 10.0, 10);
        let err = handler
            .handle(SearchGymsQuery {
                latitude: Some(12.98),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
