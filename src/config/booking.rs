//! Booking, pricing and search configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::foundation::Money;

/// Marketplace tunables. Commission and featured price here are fallbacks;
/// the platform settings table overrides them at runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Default platform commission in basis points (1000 = 10%)
    #[serde(default = "default_commission_bps")]
    pub default_commission_bps: u32,

    /// Featured listing price per day in minor units
    #[serde(default = "default_featured_price_per_day")]
    pub featured_price_per_day: i64,

    /// How long the settings cache serves a value; 0 disables caching
    #[serde(default = "default_settings_cache_ttl")]
    pub settings_cache_ttl_secs: u64,

    /// How long an unpaid checkout holds slot capacity
    #[serde(default = "default_payment_hold_minutes")]
    pub payment_hold_minutes: i64,

    #[serde(default = "default_search_radius_km")]
    pub search_default_radius_km: f64,

    /// Result count for the nearest-gyms fallback
    #[serde(default = "default_search_fallback_limit")]
    pub search_fallback_limit: u32,
}

impl BookingConfig {
    pub fn settings_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.settings_cache_ttl_secs)
    }

    pub fn payment_hold(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.payment_hold_minutes)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_commission_bps > 10_000 {
            return Err(ValidationError::InvalidCommissionRate);
        }
        if self.search_default_radius_km <= 0.0
            || self.search_fallback_limit == 0
            || self.payment_hold_minutes < 0
            || self.featured_price_per_day <= 0
            || self.featured_price_per_day > Money::MAX_PRICE.minor()
        {
            return Err(ValidationError::InvalidSearchSettings);
        }
        Ok(())
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            default_commission_bps: default_commission_bps(),
            featured_price_per_day: default_featured_price_per_day(),
            settings_cache_ttl_secs: default_settings_cache_ttl(),
            payment_hold_minutes: default_payment_hold_minutes(),
            search_default_radius_km: default_search_radius_km(),
            search_fallback_limit: default_search_fallback_limit(),
        }
    }
}

fn default_commission_bps() -> u32 {
    1000
}

fn default_featured_price_per_day() -> i64 {
    49_900
}

fn default_settings_cache_ttl() -> u64 {
    30
}

fn default_payment_hold_minutes() -> i64 {
    15
}

fn default_search_radius_km() -> f64 {
    10.0
}

fn default_search_fallback_limit() -> u32 {
    10
}
