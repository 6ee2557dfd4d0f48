//! Gym listings, their services and weekly time slots.

mod aggregate;
mod location;
mod service;
mod time_slot;

pub use aggregate::{Gym, GymDetails};
pub use location::GeoPoint;
pub use service::{GymService, NewService, ServiceType, ServiceUpdate};
pub use time_slot::{ensure_no_overlap, SlotDefinition, TimeSlot};

#[cfg(test)]
pub(crate) use aggregate::tests::details as sample_details;
