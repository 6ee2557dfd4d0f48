//! ApprovalStatus enum for listings that need sign-off before going live.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{StateMachine, ValidationError};

/// Moderation status of a gym (approved by a super-admin) or a trainer
/// (approved by the gym owner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Only approved listings are searchable and bookable.
    pub fn is_live(&self) -> bool {
        matches!(self, ApprovalStatus::Approved)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl StateMachine for ApprovalStatus {
    /// Valid transitions:
    /// - Pending -> Approved | Rejected
    /// - Approved -> Rejected (suspension)
    /// - Rejected -> Approved (reinstatement)
    fn can_transition_to(&self, target: &Self) -> bool {
        use ApprovalStatus::*;
        matches!(
            (self, target),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Rejected) | (Rejected, Approved)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ApprovalStatus::*;
        match self {
            Pending => vec![Approved, Rejected],
            Approved => vec![Rejected],
            Rejected => vec![Approved],
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown approval status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_pending() {
        assert_eq!(ApprovalStatus::default(), ApprovalStatus::Pending);
        assert!(!ApprovalStatus::Pending.is_live());
    }

    #[test]
    fn pending_can_be_approved_or_rejected() {
        assert!(ApprovalStatus::Pending.can_transition_to(&ApprovalStatus::Approved));
        assert!(ApprovalStatus::Pending.can_transition_to(&ApprovalStatus::Rejected));
    }

    #[test]
    fn nothing_returns_to_pending() {
        assert!(!ApprovalStatus::Approved.can_transition_to(&ApprovalStatus::Pending));
        assert!(!ApprovalStatus::Rejected.can_transition_to(&ApprovalStatus::Pending));
    }

    #[test]
    fn approving_twice_is_rejected() {
        assert!(ApprovalStatus::Approved
            .transition_to(ApprovalStatus::Approved)
            .is_err());
    }

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("approved".parse::<ApprovalStatus>().unwrap(), ApprovalStatus::Approved);
        assert!("Approved".parse::<ApprovalStatus>().is_err());
    }
}
