//! Paid featured listings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    DomainError, ErrorCode, FeaturedListingId, GymId, Money, Timestamp, UserId, ValidationError,
};

pub const MAX_FEATURED_DAYS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturedStatus {
    Pending,
    Active,
}

impl FeaturedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeaturedStatus::Pending => "pending",
            FeaturedStatus::Active => "active",
        }
    }
}

impl fmt::Display for FeaturedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeaturedStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FeaturedStatus::Pending),
            "active" => Ok(FeaturedStatus::Active),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown featured status '{}'", other),
            )),
        }
    }
}

/// Price of featuring a gym for `days`.
pub fn quote(days: u32, price_per_day: Money) -> Result<Money, ValidationError> {
    if days == 0 || days > MAX_FEATURED_DAYS {
        return Err(ValidationError::out_of_range(
            "days",
            1,
            i64::from(MAX_FEATURED_DAYS),
            i64::from(days),
        ));
    }
    price_per_day.checked_times(days)
}

/// A featured-listing purchase for one gym.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedListing {
    pub id: FeaturedListingId,
    pub gym_id: GymId,
    pub purchased_by: UserId,
    pub days: u32,
    pub amount: Money,
    pub status: FeaturedStatus,
    pub payment_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl FeaturedListing {
    pub fn purchase(
        gym_id: GymId,
        purchased_by: UserId,
        days: u32,
        price_per_day: Money,
    ) -> Result<Self, ValidationError> {
        let amount = quote(days, price_per_day)?;
        Ok(Self {
            id: FeaturedListingId::new(),
            gym_id,
            purchased_by,
            days,
            amount,
            status: FeaturedStatus::Pending,
            payment_order_id: None,
            payment_id: None,
            starts_at: None,
            ends_at: None,
            created_at: Timestamp::now(),
        })
    }

    /// Activates after payment. The window starts now, or where an existing
    /// featured window ends if that is later, so purchases stack.
    ///
    /// Returns the new `featured_until`.
    pub fn activate(
        &mut self,
        payment_id: impl Into<String>,
        now: Timestamp,
        current_featured_until: Option<Timestamp>,
    ) -> Result<Timestamp, DomainError> {
        if self.status == FeaturedStatus::Active {
            return self.ends_at.ok_or_else(|| {
                DomainError::new(ErrorCode::InternalError, "Active listing has no end")
            });
        }
        let start = match current_featured_until {
            Some(until) if until.is_after(&now) => until,
            _ => now,
        };
        let end = start.add_days(i64::from(self.days));
        self.status = FeaturedStatus::Active;
        self.payment_id = Some(payment_id.into());
        self.starts_at = Some(start);
        self.ends_at = Some(end);
        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_multiplies_days() {
        assert_eq!(
            quote(7, Money::from_major(499)).unwrap(),
            Money::from_major(3493)
        );
        assert!(quote(0, Money::from_major(499)).is_err());
        assert!(quote(91, Money::from_major(499)).is_err());
    }

    #[test]
    fn activate_starts_now_when_not_featured() {
        let mut listing = FeaturedListing::purchase(GymId::new(), UserId::new(), 3, Money::from_major(100)).unwrap();
        let now = Timestamp::now();
        let end = listing.activate("pay_1", now, None).unwrap();
        assert_eq!(end, now.add_days(3));
        assert_eq!(listing.status, FeaturedStatus::Active);
    }

    #[test]
    fn activate_stacks_on_existing_window() {
        let mut listing = FeaturedListing::purchase(GymId::new(), UserId::new(), 3, Money::from_major(100)).unwrap();
        let now = Timestamp::now();
        let current = now.add_days(5);
        let end = listing.activate("pay_1", now, Some(current)).unwrap();
        assert_eq!(end, now.add_days(8));
    }

    #[test]
    fn activate_twice_is_idempotent() {
        let mut listing = FeaturedListing::purchase(GymId::new(), UserId::new(), 3, Money::from_major(100)).unwrap();
        let now = Timestamp::now();
        let first = listing.activate("pay_1", now, None).unwrap();
        let second = listing.activate("pay_2", now.add_days(1), Some(first)).unwrap();
        assert_eq!(first, second);
        assert_eq!(listing.payment_id.as_deref(), Some("pay_1"));
    }
}
