//! Trainer profile aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ApprovalStatus, DomainError, ErrorCode, GymId, Money, OwnedByUser, RatingSummary,
    StateMachine, Timestamp, TrainerId, UserId, ValidationError,
};

/// Trainer-editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerProfile {
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub hourly_rate: Money,
}

impl TrainerProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.display_name.trim().is_empty() {
            return Err(ValidationError::empty_field("display_name"));
        }
        Money::try_price("hourly_rate", self.hourly_rate)?;
        Ok(())
    }
}

/// A trainer working out of one gym, approved by that gym's owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: TrainerId,
    pub user_id: UserId,
    pub gym_id: GymId,
    #[serde(flatten)]
    pub profile: TrainerProfile,
    pub status: ApprovalStatus,
    pub rating: RatingSummary,
    pub created_at: Timestamp,
}

impl Trainer {
    pub fn register(user_id: UserId, gym_id: GymId, profile: TrainerProfile) -> Result<Self, ValidationError> {
        profile.validate()?;
        Ok(Self {
            id: TrainerId::new(),
            user_id,
            gym_id,
            profile,
            status: ApprovalStatus::Pending,
            rating: RatingSummary::default(),
            created_at: Timestamp::now(),
        })
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
                format!("Trainer is already {}", self.status),
            )
        })?;
        Ok(())
    }

    pub fn ensure_bookable(&self) -> Result<(), DomainError> {
        if self.status.is_live() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::TrainerNotApproved,
                "Trainer is not accepting bookings",
            )
            .with_detail("trainer_id", self.id.to_string()))
        }
    }

    pub fn hourly_rate(&self) -> Money {
        self.profile.hourly_rate
    }
}

impl OwnedByUser for Trainer {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn profile() -> TrainerProfile {
        TrainerProfile {
            display_name: "Arjun".to_string(),
            bio: "Strength coach".to_string(),
            specialties: vec!["powerlifting".to_string()],
            hourly_rate: Money::from_major(500),
        }
    }

    #[test]
    fn register_starts_pending_and_unbookable() {
        let trainer = Trainer::register(UserId::new(), GymId::new(), profile()).unwrap();
        assert_eq!(trainer.status, ApprovalStatus::Pending);
        let err = trainer.ensure_bookable().unwrap_err();
        assert_eq!(err.code, ErrorCode::TrainerNotApproved);
    }

    #[test]
    fn register_requires_rate_in_range() {
        let p = TrainerProfile {
            hourly_rate: Money::ZERO,
            ..profile()
        };
        assert!(Trainer::register(UserId::new(), GymId::new(), p).is_err());

        let p = TrainerProfile {
            hourly_rate: Money::from_minor(100_000_000_000_000_000),
            ..profile()
        };
        assert!(Trainer::register(UserId::new(), GymId::new(), p).is_err());
    }

    #[test]
    fn approval_enables_booking() {
        let mut trainer = Trainer::register(UserId::new(), GymId::new(), profile()).unwrap();
        trainer.approve().unwrap();
        assert!(trainer.ensure_bookable().is_ok());
        trainer.reject().unwrap();
        assert!(trainer.ensure_bookable().is_err());
    }
}
