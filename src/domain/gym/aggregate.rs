//! Gym aggregate entity.
//!
//! A gym is listed by its owner, moderated by a super-admin and becomes
//! searchable and bookable only once approved. Rating fields are derived
//! from reviews and never edited directly.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ApprovalStatus, DomainError, ErrorCode, GymId, OwnedByUser, RatingSummary, StateMachine,
    Timestamp, UserId, ValidationError,
};

use super::GeoPoint;

/// Owner-editable description of a gym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymDetails {
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub location: GeoPoint,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl GymDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self.address.trim().is_empty() {
            return Err(ValidationError::empty_field("address"));
        }
        if self.city.trim().is_empty() {
            return Err(ValidationError::empty_field("city"));
        }
        GeoPoint::try_new(self.location.latitude, self.location.longitude)?;
        Ok(())
    }
}

/// Gym aggregate.
///
/// # Invariants
///
/// - Only `Approved` gyms accept bookings
/// - `rating`/`total_reviews` mirror the reviews table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gym {
    pub id: GymId,
    pub owner_id: UserId,
    #[serde(flatten)]
    pub details: GymDetails,
    pub status: ApprovalStatus,
    pub rating: RatingSummary,
    /// Set by featured-listing purchases; the gym ranks first while in the future.
    pub featured_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Gym {
    /// Lists a new gym awaiting approval.
    pub fn create(owner_id: UserId, details: GymDetails) -> Result<Self, ValidationError> {
        details.validate()?;
        let now = Timestamp::now();
        Ok(Self {
            id: GymId::new(),
            owner_id,
            details,
            status: ApprovalStatus::Pending,
            rating: RatingSummary::default(),
            featured_until: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_details(&mut self, details: GymDetails) -> Result<(), ValidationError> {
        details.validate()?;
        self.details = details;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn approve(&mut self) -> Result<(), DomainError> {
        self.moderate(ApprovalStatus::Approved)
    }

    pub fn reject(&mut self) -> Result<(), DomainError> {
        self.moderate(ApprovalStatus::Rejected)
    }

    fn moderate(&mut self, target: ApprovalStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Gym is already {}", self.status),
            )
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Fails unless the gym is approved.
    pub fn ensure_bookable(&self) -> Result<(), DomainError> {
        if self.status.is_live() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::GymNotApproved,
                "Gym is not accepting bookings",
            )
            .with_detail("gym_id", self.id.to_string()))
        }
    }

    pub fn is_featured(&self, now: &Timestamp) -> bool {
        self.featured_until.map_or(false, |until| until.is_after(now))
    }
}

impl OwnedByUser for Gym {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn details() -> GymDetails {
        GymDetails {
            name: "Iron Temple".to_string(),
            description: "Strength gym".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            location: GeoPoint::try_new(12.97, 77.59).unwrap(),
            amenities: vec!["showers".to_string()],
            images: vec![],
        }
    }

    #[test]
    fn create_starts_pending() {
        let gym = Gym::create(UserId::new(), details()).unwrap();
        assert_eq!(gym.status, ApprovalStatus::Pending);
        assert_eq!(gym.rating.total_reviews, 0);
        assert!(gym.ensure_bookable().is_err());
    }

    #[test]
    fn create_rejects_blank_name() {
        let mut d = details();
        d.name = "  ".to_string();
        assert_eq!(
            Gym::create(UserId::new(), d).unwrap_err(),
            ValidationError::empty_field("name")
        );
    }

    #[test]
    fn approve_makes_bookable() {
        let mut gym = Gym::create(UserId::new(), details()).unwrap();
        gym.approve().unwrap();
        assert!(gym.ensure_bookable().is_ok());
    }

    #[test]
    fn approve_twice_fails() {
        let mut gym = Gym::create(UserId::new(), details()).unwrap();
        gym.approve().unwrap();
        let err = gym.approve().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn featured_only_while_in_future() {
        let mut gym = Gym::create(UserId::new(), details()).unwrap();
        let now = Timestamp::now();
        assert!(!gym.is_featured(&now));
        gym.featured_until = Some(now.add_days(3));
        assert!(gym.is_featured(&now));
        assert!(!gym.is_featured(&now.add_days(4)));
    }

    #[test]
    fn owner_check() {
        let owner = UserId::new();
        let gym = Gym::create(owner, details()).unwrap();
        assert!(gym.check_ownership(&owner).is_ok());
        assert!(gym.check_ownership(&UserId::new()).is_err());
    }
}
