//! Gym bookings: pricing, capacity validation and the redemption lifecycle.

mod aggregate;
mod capacity;
mod errors;
mod pricing;
mod status;
mod token;

pub use aggregate::{Booking, BookingRequest, Redemption, TrainerRate};
pub use capacity::{CapacityPolicy, Occupancy};
pub use errors::BookingError;
pub use pricing::PriceBreakdown;
pub use status::{BookingStatus, PaymentStatus};
pub use token::RedemptionToken;
