//! Money value object in integer minor units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use super::ValidationError;

/// An amount of the platform currency in minor units (paise).
///
/// All pricing arithmetic is done on integers; the only rounding happens
/// in [`super::CommissionRate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    /// Ceiling for any single list price (service price, hourly rate,
    /// featured price per day): 1 crore rupees. Booking totals are a
    /// bounded multiple of these, so they stay far inside `i64`.
    pub const MAX_PRICE: Self = Self(1_000_000_000);

    /// Creates an amount from minor units.
    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Accepts a list price in `1..=MAX_PRICE`.
    pub fn try_price(field: &str, amount: Money) -> Result<Self, ValidationError> {
        if amount.0 < 1 || amount > Self::MAX_PRICE {
            return Err(ValidationError::out_of_range(field, 1, Self::MAX_PRICE.0, amount.0));
        }
        Ok(amount)
    }

    /// Creates an amount from whole major units (rupees).
    pub fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    /// Multiplies by a count (hours, days).
    pub fn checked_times(&self, count: u32) -> Result<Self, ValidationError> {
        self.0
            .checked_mul(i64::from(count))
            .map(Self)
            .ok_or_else(|| overflow(format!("{} x {}", self, count)))
    }

    pub fn checked_add(&self, rhs: Money) -> Result<Self, ValidationError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| overflow(format!("{} + {}", self, rhs)))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

fn overflow(expr: String) -> ValidationError {
    ValidationError::invalid_format("amount", format!("{} overflows", expr))
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
