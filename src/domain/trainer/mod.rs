//! Trainers and their standalone session bookings.

mod aggregate;
mod booking;

pub use aggregate::{Trainer, TrainerProfile};
pub use booking::{TrainerBooking, TrainerBookingStatus};
