//! In-memory implementations of every repository port.
//!
//! All tables live behind one async mutex, so operations that span tables
//! (capacity checks across bookings, rating recompute, featured activation)
//! are atomic the same way a Postgres transaction is. Used by handler tests,
//! the integration tests and local runs without a database.

mod bookings;
mod catalog;
mod monetization;
mod reviews;
mod trainers;
mod users;

use std::collections::HashMap;
use tokio::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::booking::{Booking, Occupancy};
use crate::domain::foundation::{
    BookingId, FeaturedListingId, GymId, ServiceId, SlotId, TrainerBookingId, TrainerId, UserId,
};
use crate::domain::gym::{Gym, GymService, TimeSlot};
use crate::domain::monetization::{FeaturedListing, PaymentTransaction, Payout};
use crate::domain::review::Review;
use crate::domain::settings::PlatformSettings;
use crate::domain::trainer::{Trainer, TrainerBooking};
use crate::domain::user::User;

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    gyms: HashMap<GymId, Gym>,
    services: HashMap<ServiceId, GymService>,
    slots: HashMap<SlotId, TimeSlot>,
    bookings: HashMap<BookingId, Booking>,
    trainers: HashMap<TrainerId, Trainer>,
    trainer_bookings: HashMap<TrainerBookingId, TrainerBooking>,
    reviews: Vec<Review>,
    settings: Option<PlatformSettings>,
    featured: HashMap<FeaturedListingId, FeaturedListing>,
    payouts: Vec<Payout>,
    transactions: Vec<PaymentTransaction>,
}

impl Tables {
    /// A trainer's calendar for one date: their direct sessions plus gym
    /// bookings they are attached to, minus the booking `skip`.
    fn trainer_calendar(&self, trainer_id: &TrainerId, date: NaiveDate, skip: &Uuid) -> Vec<Occupancy> {
        let direct = self
            .trainer_bookings
            .values()
            .filter(|b| &b.trainer_id == trainer_id && b.date == date && b.id.as_uuid() != skip)
            .map(TrainerBooking::occupancy);
        let attached = self
            .bookings
            .values()
            .filter(|b| b.trainer_id.as_ref() == Some(trainer_id) && b.date == date)
            .filter(|b| b.id.as_uuid() != skip)
            .filter_map(Booking::occupancy);
        direct.chain(attached).collect()
    }
}

/// Shared in-memory store implementing all repository ports.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().await
    }

    /// Number of payment log rows (for test assertions).
    pub async fn transaction_count(&self) -> usize {
        self.tables().await.transactions.len()
    }

    /// Edits a stored booking in place, bypassing the port (for tests that
    /// need states the API cannot reach directly, such as a lapsed window).
    pub async fn edit_booking<F>(&self, id: &BookingId, edit: F) -> bool
    where
        F: FnOnce(&mut Booking),
    {
        match self.tables().await.bookings.get_mut(id) {
            Some(booking) => {
                edit(booking);
                true
            }
            None => false,
        }
    }
}

/// Newest first by `created_at`.
fn newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> crate::domain::foundation::Timestamp,
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}
