//! Payouts to gyms and trainers, and the earnings they settle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    GymId, Money, PayoutId, Timestamp, TrainerId, UserId, ValidationError,
};

/// Who receives a payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "payee_type", content = "payee_id", rename_all = "snake_case")]
pub enum Payee {
    Gym(GymId),
    Trainer(TrainerId),
}

impl Payee {
    pub fn kind(&self) -> &'static str {
        match self {
            Payee::Gym(_) => "gym",
            Payee::Trainer(_) => "trainer",
        }
    }

    pub fn id_string(&self) -> String {
        match self {
            Payee::Gym(id) => id.to_string(),
            Payee::Trainer(id) => id.to_string(),
        }
    }
}

impl fmt::Display for Payee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id_string())
    }
}

/// A settlement recorded by a super-admin (the transfer itself happens
/// outside the platform).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub id: PayoutId,
    pub payee: Payee,
    pub amount: Money,
    /// Bank or transfer reference.
    pub reference: String,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

impl Payout {
    /// Records a payout; may not exceed what is outstanding.
    pub fn record(
        payee: Payee,
        amount: Money,
        reference: impl Into<String>,
        created_by: UserId,
        outstanding: Money,
    ) -> Result<Self, ValidationError> {
        if amount.minor() <= 0 || amount > outstanding {
            return Err(ValidationError::out_of_range(
                "amount",
                1,
                outstanding.minor(),
                amount.minor(),
            ));
        }
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(ValidationError::empty_field("reference"));
        }
        Ok(Self {
            id: PayoutId::new(),
            payee,
            amount,
            reference: reference.trim().to_string(),
            created_by,
            created_at: Timestamp::now(),
        })
    }
}

/// Earned vs. settled amounts for one payee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsSummary {
    pub payee: Payee,
    /// Paid bookings not cancelled.
    pub paid_bookings: i64,
    pub earned: Money,
    pub paid_out: Money,
}

impl EarningsSummary {
    pub fn outstanding(&self) -> Money {
        self.earned - self.paid_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payout_cannot_exceed_outstanding() {
        let payee = Payee::Gym(GymId::new());
        let result = Payout::record(payee, Money::from_major(101), "UTR1", UserId::new(), Money::from_major(100));
        assert!(result.is_err());
        let ok = Payout::record(payee, Money::from_major(100), "UTR1", UserId::new(), Money::from_major(100));
        assert!(ok.is_ok());
    }

    #[test]
    fn payout_requires_reference() {
        let payee = Payee::Trainer(TrainerId::new());
        assert!(Payout::record(payee, Money::from_major(1), " ", UserId::new(), Money::from_major(5)).is_err());
    }

    #[test]
    fn outstanding_is_earned_minus_paid() {
        let summary = EarningsSummary {
            payee: Payee::Gym(GymId::new()),
            paid_bookings: 3,
            earned: Money::from_major(540),
            paid_out: Money::from_major(200),
        };
        assert_eq!(summary.outstanding(), Money::from_major(340));
    }

    #[test]
    fn payee_serializes_tagged() {
        let id = TrainerId::new();
        let json = serde_json::to_value(Payee::Trainer(id)).unwrap();
        assert_eq!(json["payee_type"], "trainer");
    }
}
