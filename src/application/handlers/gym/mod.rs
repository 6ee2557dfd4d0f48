//! Gym catalog handlers.

mod create_gym;
mod get_availability;
mod gym_queries;
mod manage_services;
mod manage_slots;
mod moderate_gym;
mod search_gyms;
mod update_gym;

pub use create_gym::{CreateGymCommand, CreateGymHandler};
pub use get_availability::{GetAvailabilityHandler, HourAvailability, SlotAvailability};
pub use gym_queries::GymQueries;
pub use manage_services::{CreateServiceCommand, ManageServicesHandler, UpdateServiceCommand};
pub use manage_slots::{CreateSlotCommand, ManageSlotsHandler, UpdateSlotCommand};
pub use moderate_gym::{ModerateGymCommand, ModerateGymHandler, Moderation};
pub use search_gyms::{SearchGymsHandler, SearchGymsQuery};
pub use update_gym::{UpdateGymCommand, UpdateGymHandler};
