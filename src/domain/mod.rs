//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, money, hours, errors, roles)
//! - `gym` - Gym aggregate, services and weekly time slots
//! - `booking` - Gym bookings: pricing, capacity, redemption
//! - `trainer` - Trainer profiles and direct trainer sessions
//! - `review` - Ratings tied to completed bookings
//! - `search` - Two-phase geo search
//! - `monetization` - Featured listings, payouts, platform stats
//! - `settings` - Super-admin editable platform settings
//! - `user` - Local accounts and role promotion

pub mod booking;
pub mod foundation;
pub mod gym;
pub mod monetization;
pub mod review;
pub mod search;
pub mod settings;
pub mod trainer;
pub mod user;
