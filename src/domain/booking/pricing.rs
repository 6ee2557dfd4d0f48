//! Price computation and commission split.
//!
//! A split is computed once when a booking is created and stored on the
//! booking; later rate changes never touch it.
//!
//! # Invariant
//!
//! `gym_earnings + platform_commission + trainer_earnings == total` exactly.
//! Every share except one is rounded; the last share is the remainder.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CommissionRate, Money, ValidationError};
use crate::domain::gym::ServiceType;

/// Monetary breakdown of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub total: Money,
    pub platform_commission: Money,
    pub gym_earnings: Money,
    pub trainer_earnings: Money,
    /// Rate in force when the booking was created.
    pub commission_rate: CommissionRate,
}

impl PriceBreakdown {
    /// Prices a gym booking, optionally with a trainer attached.
    ///
    /// Sessions are charged per hour; passes and memberships are flat and
    /// ignore `hours`. The trainer's hourly rate is added to the hourly
    /// price, and the trainer keeps their share net of commission.
    pub fn for_gym_booking(
        service_type: ServiceType,
        price: Money,
        hours: u32,
        trainer_hourly_rate: Option<Money>,
        rate: CommissionRate,
    ) -> Result<Self, ValidationError> {
        let (total, trainer_gross) = if service_type.is_hourly() {
            let trainer_gross = match trainer_hourly_rate {
                Some(r) => r.checked_times(hours)?,
                None => Money::ZERO,
            };
            (price.checked_times(hours)?.checked_add(trainer_gross)?, trainer_gross)
        } else {
            (price, Money::ZERO)
        };

        let platform_commission = rate.commission_on(total);
        let trainer_earnings = rate.net_of_commission(trainer_gross);
        let gym_earnings = total - platform_commission - trainer_earnings;

        Ok(Self {
            total,
            platform_commission,
            gym_earnings,
            trainer_earnings,
            commission_rate: rate,
        })
    }

    /// Prices a standalone trainer session; the gym takes no share.
    pub fn for_trainer_session(
        hourly_rate: Money,
        hours: u32,
        rate: CommissionRate,
    ) -> Result<Self, ValidationError> {
        let total = hourly_rate.checked_times(hours)?;
        let platform_commission = rate.commission_on(total);
        Ok(Self {
            total,
            platform_commission,
            gym_earnings: Money::ZERO,
            trainer_earnings: total - platform_commission,
            commission_rate: rate,
        })
    }

    pub fn is_balanced(&self) -> bool {
        self.gym_earnings + self.platform_commission + self.trainer_earnings == self.total
    }
}
