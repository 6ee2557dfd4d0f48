//! Commission rate value object (basis points, 0-10000).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Money, ValidationError};

const FULL: i64 = 10_000;

/// The platform's cut of a booking, in basis points (1000 = 10%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommissionRate(u32);

impl CommissionRate {
    pub const ZERO: Self = Self(0);

    /// Creates a rate, returning error if above 100%.
    pub fn try_from_bps(bps: u32) -> Result<Self, ValidationError> {
        if i64::from(bps) > FULL {
            return Err(ValidationError::out_of_range(
                "commission_rate",
                0,
                FULL,
                i64::from(bps),
            ));
        }
        Ok(Self(bps))
    }

    /// Creates a rate from a percentage with up to two decimals (e.g. 12.5).
    pub fn try_from_percent(percent: f64) -> Result<Self, ValidationError> {
        let bps = (percent * 100.0).round();
        if !(0.0..=FULL as f64).contains(&bps) {
            return Err(ValidationError::out_of_range(
                "commission_rate",
                0,
                100,
                percent.round() as i64,
            ));
        }
        Ok(Self(bps as u32))
    }

    pub fn bps(&self) -> u32 {
        self.0
    }

    pub fn as_percent(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Platform share of `amount`, rounded half-up to the nearest minor unit.
    pub fn commission_on(&self, amount: Money) -> Money {
        let share = (i128::from(amount.minor()) * i128::from(self.0) + i128::from(FULL / 2))
            / i128::from(FULL);
        // A share never exceeds `amount`, so it always fits back in i64.
        Money::from_minor(i64::try_from(share).unwrap_or(amount.minor()))
    }

    /// What remains of `amount` after the platform share.
    ///
    /// Always equals `amount - commission_on(amount)`, so splits built from
    /// these two never lose a minor unit.
    pub fn net_of_commission(&self, amount: Money) -> Money {
        amount - self.commission_on(amount)
    }
}

impl fmt::Display for CommissionRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_rejects_above_hundred_percent() {
        assert!(CommissionRate::try_from_bps(10_000).is_ok());
        assert!(CommissionRate::try_from_bps(10_001).is_err());
    }

    #[test]
    fn rate_from_percent() {
        assert_eq!(CommissionRate::try_from_percent(10.0).unwrap().bps(), 1000);
        assert_eq!(CommissionRate::try_from_percent(12.5).unwrap().bps(), 1250);
        assert!(CommissionRate::try_from_percent(-1.0).is_err());
        assert!(CommissionRate::try_from_percent(100.5).is_err());
    }

    #[test]
    fn commission_rounds_half_up() {
        let rate = CommissionRate::try_from_bps(1000).unwrap();
        assert_eq!(rate.commission_on(Money::from_minor(5)), Money::from_minor(1));
        assert_eq!(rate.commission_on(Money::from_minor(4)), Money::ZERO);
    }

    #[test]
    fn commission_on_large_amount_does_not_overflow() {
        let rate = CommissionRate::try_from_bps(1000).unwrap();
        let amount = Money::from_minor(i64::MAX);
        assert_eq!(rate.commission_on(amount), Money::from_minor(i64::MAX / 10 + 1));
        assert_eq!(CommissionRate::try_from_bps(10_000).unwrap().commission_on(amount), amount);
    }

    #[test]
    fn net_of_commission_complements() {
        let rate = CommissionRate::try_from_bps(1000).unwrap();
        let amount = Money::from_major(1000);
        assert_eq!(rate.net_of_commission(amount), Money::from_major(900));
    }

    #[test]
    fn display_as_percent() {
        assert_eq!(CommissionRate::try_from_bps(1250).unwrap().to_string(), "12.5%");
    }
}
