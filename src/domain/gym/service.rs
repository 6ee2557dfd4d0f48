//! Bookable services offered by a gym.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{GymId, Money, ServiceId, Timestamp, ValidationError};

/// What a service sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Hourly access within the gym's time slots; priced per hour.
    Session,
    /// Multi-day access; flat price.
    Pass,
    /// Long-running access; flat price.
    Membership,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Session => "session",
            ServiceType::Pass => "pass",
            ServiceType::Membership => "membership",
        }
    }

    pub fn is_hourly(&self) -> bool {
        matches!(self, ServiceType::Session)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(ServiceType::Session),
            "pass" => Ok(ServiceType::Pass),
            "membership" => Ok(ServiceType::Membership),
            other => Err(ValidationError::invalid_format(
                "service_type",
                format!("unknown service type '{}'", other),
            )),
        }
    }
}

/// Input for creating a service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewService {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub service_type: ServiceType,
    /// Per hour for sessions, flat otherwise.
    pub price: Money,
    /// Validity in days; required for passes and memberships.
    pub duration_days: Option<u32>,
    /// Visit limit for passes and memberships; `None` means unlimited.
    pub session_count: Option<u32>,
}

/// The subset of a service that stays editable once bookings reference it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceUpdate {
    pub price: Option<Money>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GymService {
    pub id: ServiceId,
    pub gym_id: GymId,
    pub name: String,
    pub description: String,
    pub service_type: ServiceType,
    pub price: Money,
    pub duration_days: Option<u32>,
    pub session_count: Option<u32>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl GymService {
    pub fn create(gym_id: GymId, input: NewService) -> Result<Self, ValidationError> {
        if input.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Money::try_price("price", input.price)?;

        let (duration_days, session_count) = match input.service_type {
            ServiceType::Session => (None, None),
            ServiceType::Pass | ServiceType::Membership => {
                let days = input
                    .duration_days
                    .ok_or_else(|| ValidationError::empty_field("duration_days"))?;
                if days == 0 {
                    return Err(ValidationError::out_of_range("duration_days", 1, 3650, 0));
                }
                if input.session_count == Some(0) {
                    return Err(ValidationError::out_of_range("session_count", 1, i64::MAX, 0));
                }
                (Some(days), input.session_count)
            }
        };

        Ok(Self {
            id: ServiceId::new(),
            gym_id,
            name: input.name.trim().to_string(),
            description: input.description,
            service_type: input.service_type,
            price: input.price,
            duration_days,
            session_count,
            is_active: true,
            created_at: Timestamp::now(),
        })
    }

    /// Applies the editable fields; name, type and durations are fixed.
    pub fn apply_update(&mut self, update: ServiceUpdate) -> Result<(), ValidationError> {
        if let Some(price) = update.price {
            self.price = Money::try_price("price", price)?;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(active) = update.is_active {
            self.is_active = active;
        }
        Ok(())
    }
}
