//! Mutable platform settings.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CommissionRate, Money, ValidationError};

/// Settings editable by super-admins without a redeploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSettings {
    pub commission_rate: CommissionRate,
    pub featured_price_per_day: Money,
}

/// Partial update; absent fields are unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SettingsUpdate {
    /// Percentage, e.g. `12.5`.
    pub commission_percent: Option<f64>,
    pub featured_price_per_day: Option<Money>,
}

impl PlatformSettings {
    pub fn apply(&self, update: SettingsUpdate) -> Result<Self, ValidationError> {
        let mut next = *self;
        if let Some(percent) = update.commission_percent {
            next.commission_rate = CommissionRate::try_from_percent(percent)?;
        }
        if let Some(price) = update.featured_price_per_day {
            next.featured_price_per_day = Money::try_price("featured_price_per_day", price)?;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PlatformSettings {
        PlatformSettings {
            commission_rate: CommissionRate::try_from_bps(1000).unwrap(),
            featured_price_per_day: Money::from_major(499),
        }
    }

    #[test]
    fn apply_updates_commission() {
        let next = defaults()
            .apply(SettingsUpdate {
                commission_percent: Some(15.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(next.commission_rate.bps(), 1500);
        assert_eq!(next.featured_price_per_day, Money::from_major(499));
    }

    #[test]
    fn apply_rejects_bad_values() {
        assert!(defaults()
            .apply(SettingsUpdate {
                commission_percent: Some(120.0),
                ..Default::default()
            })
            .is_err());
        assert!(defaults()
            .apply(SettingsUpdate {
                featured_price_per_day: Some(Money::ZERO),
                ..Default::default()
            })
            .is_err());
        assert!(defaults()
            .apply(SettingsUpdate {
                featured_price_per_day: Some(Money::MAX_PRICE + Money::from_minor(1)),
                ..Default::default()
            })
            .is_err());
    }
}
