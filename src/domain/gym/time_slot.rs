//! Recurring weekly time slots and their no-overlap invariant.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DayOfWeek, DomainError, ErrorCode, GymId, Hour, HourRange, SlotId, ValidationError,
};

/// Input for creating or replacing a slot definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlotDefinition {
    pub day_of_week: DayOfWeek,
    pub start_time: Hour,
    pub end_time: Hour,
    pub max_capacity: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A weekly window during which a gym accepts up to `max_capacity`
/// concurrent bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    pub gym_id: GymId,
    pub day_of_week: DayOfWeek,
    pub hours: HourRange,
    pub max_capacity: u32,
    pub is_active: bool,
}

impl TimeSlot {
    pub fn create(gym_id: GymId, def: SlotDefinition) -> Result<Self, ValidationError> {
        let hours = HourRange::try_new(def.start_time, def.end_time)?;
        if def.max_capacity == 0 {
            return Err(ValidationError::out_of_range("max_capacity", 1, 10_000, 0));
        }
        Ok(Self {
            id: SlotId::new(),
            gym_id,
            day_of_week: def.day_of_week,
            hours,
            max_capacity: def.max_capacity,
            is_active: def.is_active,
        })
    }

    /// Replaces the definition, keeping identity.
    pub fn redefine(&mut self, def: SlotDefinition) -> Result<(), ValidationError> {
        let replacement = TimeSlot::create(self.gym_id, def)?;
        self.day_of_week = replacement.day_of_week;
        self.hours = replacement.hours;
        self.max_capacity = replacement.max_capacity;
        self.is_active = replacement.is_active;
        Ok(())
    }

    /// True if this active slot accepts bookings at `hour`.
    pub fn covers(&self, day: DayOfWeek, hour: Hour) -> bool {
        self.is_active && self.day_of_week == day && self.hours.contains(hour)
    }

    fn clashes_with(&self, other: &TimeSlot) -> bool {
        self.id != other.id
            && self.is_active
            && other.is_active
            && self.day_of_week == other.day_of_week
            && self.hours.overlaps(&other.hours)
    }
}

/// Fails with `SlotOverlap` if `candidate` intersects any other active slot
/// of the same gym and day. `existing` may include the candidate itself.
pub fn ensure_no_overlap(candidate: &TimeSlot, existing: &[TimeSlot]) -> Result<(), DomainError> {
    match existing.iter().find(|slot| candidate.clashes_with(slot)) {
        Some(clash) => Err(DomainError::new(
            ErrorCode::SlotOverlap,
            format!("Time slot overlaps existing slot {}", clash.hours),
        )
        .with_detail("slot_id", clash.id.to_string())),
        None => Ok(()),
    }
}
