//! Slot capacity and trainer calendar checks.
//!
//! Both checks are pure functions over rows the caller has already loaded
//! (and, in Postgres, locked) inside the booking transaction. The caller
//! supplies the bookings of one gym/date or one trainer/date; these
//! functions decide which of them occupy an hour.

use chrono::Duration;

use crate::domain::foundation::{DayOfWeek, Hour, HourRange, Timestamp};
use crate::domain::gym::TimeSlot;

use super::{BookingError, BookingStatus};

/// A booking as seen by the capacity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    pub hours: HourRange,
    pub status: BookingStatus,
    pub created_at: Timestamp,
}

/// Decides which bookings hold capacity.
///
/// Paid bookings (`confirmed`, `used`) always do. An unpaid checkout holds
/// its place for `payment_hold` after creation so two buyers cannot both
/// pass the check and then both pay for the last place.
#[derive(Debug, Clone, Copy)]
pub struct CapacityPolicy {
    pub payment_hold: Duration,
}

impl CapacityPolicy {
    pub fn new(payment_hold: Duration) -> Self {
        Self { payment_hold }
    }

    pub fn holds_capacity(&self, status: BookingStatus, created_at: &Timestamp, now: &Timestamp) -> bool {
        match status {
            BookingStatus::Confirmed | BookingStatus::Used => true,
            BookingStatus::PendingPayment => created_at.is_after(&now.minus(self.payment_hold)),
            BookingStatus::Cancelled | BookingStatus::Expired => false,
        }
    }

    /// True once an unpaid checkout created at `created_at` has stopped
    /// holding its place. Paying for it then needs a fresh capacity check.
    pub fn hold_lapsed(&self, created_at: &Timestamp, now: &Timestamp) -> bool {
        !self.holds_capacity(BookingStatus::PendingPayment, created_at, now)
    }

    /// Validates every hour of `requested` against its own slot.
    ///
    /// For each hour `h` in `[start, end)`: an active slot of `day` must
    /// cover `h`, and fewer than `max_capacity` holding bookings may
    /// contain `h`. The first failing hour aborts the check.
    pub fn check_slot_capacity(
        &self,
        day: DayOfWeek,
        requested: HourRange,
        slots: &[TimeSlot],
        existing: &[Occupancy],
        now: &Timestamp,
    ) -> Result<(), BookingError> {
        for hour in requested.checkpoints() {
            let slot = slots
                .iter()
                .find(|slot| slot.covers(day, hour))
                .ok_or_else(|| BookingError::slot_unavailable(hour))?;

            let held = existing
                .iter()
                .filter(|b| b.hours.contains(hour))
                .filter(|b| self.holds_capacity(b.status, &b.created_at, now))
                .count() as u64;

            if held >= u64::from(slot.max_capacity) {
                return Err(BookingError::slot_full(hour, slot.max_capacity));
            }
        }
        Ok(())
    }

    /// Rejects `requested` if it intersects any booking still holding the
    /// trainer's time. Ranges that only touch are allowed.
    pub fn check_trainer_free(
        &self,
        requested: HourRange,
        calendar: &[Occupancy],
        now: &Timestamp,
    ) -> Result<(), BookingError> {
        match calendar
            .iter()
            .filter(|b| self.holds_capacity(b.status, &b.created_at, now))
            .find(|b| b.hours.overlaps(&requested))
        {
            Some(conflict) => Err(BookingError::trainer_unavailable(requested, conflict.hours)),
            None => Ok(()),
        }
    }

    /// Remaining places per hour of a day, for availability listings.
    pub fn remaining_by_hour(
        &self,
        slot: &TimeSlot,
        existing: &[Occupancy],
        now: &Timestamp,
    ) -> Vec<(Hour, u32)> {
        slot.hours
            .checkpoints()
            .map(|hour| {
                let held = existing
                    .iter()
                    .filter(|b| b.hours.contains(hour))
                    .filter(|b| self.holds_capacity(b.status, &b.created_at, now))
                    .count() as u32;
                (hour, slot.max_capacity.saturating_sub(held))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::GymId;
    use crate::domain::gym::SlotDefinition;
    use chrono::NaiveDate;

    fn h(v: u8) -> Hour {
        Hour::try_new(v).unwrap()
    }

    fn range(start: u8, end: u8) -> HourRange {
        HourRange::try_new(h(start), h(end)).unwrap()
    }

    fn monday() -> DayOfWeek {
        DayOfWeek::of(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
    }

    fn slot(start: u8, end: u8, capacity: u32) -> TimeSlot {
        TimeSlot::create(
            GymId::new(),
            SlotDefinition {
                day_of_week: monday(),
                start_time: h(start),
                end_time: h(end),
                max_capacity: capacity,
                is_active: true,
            },
        )
        .unwrap()
    }

    fn confirmed(start: u8, end: u8) -> Occupancy {
        Occupancy {
            hours: range(start, end),
            status: BookingStatus::Confirmed,
            created_at: Timestamp::now(),
        }
    }

    fn policy() -> CapacityPolicy {
        CapacityPolicy::new(Duration::minutes(15))
    }

    #[test]
    fn full_evening_slot_rejects_booking() {
        let slots = vec![slot(17, 19, 25)];
        let existing: Vec<Occupancy> = (0..25).map(|_| confirmed(18, 19)).collect();
        let err = policy()
            .check_slot_capacity(monday(), range(18, 19), &slots, &existing, &Timestamp::now())
            .unwrap_err();
        assert_eq!(err, BookingError::slot_full(h(18), 25));
    }

    #[test]
    fn one_place_left_is_accepted() {
        let slots = vec![slot(17, 19, 25)];
        let existing: Vec<Occupancy> = (0..24).map(|_| confirmed(17, 19)).collect();
        assert!(policy()
            .check_slot_capacity(monday(), range(18, 19), &slots, &existing, &Timestamp::now())
            .is_ok());
    }

    #[test]
    fn hour_without_slot_is_unavailable() {
        let slots = vec![slot(17, 19, 25)];
        let err = policy()
            .check_slot_capacity(monday(), range(18, 20), &slots, &[], &Timestamp::now())
            .unwrap_err();
        assert_eq!(err, BookingError::slot_unavailable(h(19)));
    }

    #[test]
    fn other_day_slot_does_not_count() {
        let slots = vec![slot(17, 19, 25)];
        let tuesday = DayOfWeek::try_new(2).unwrap();
        let err = policy()
            .check_slot_capacity(tuesday, range(17, 18), &slots, &[], &Timestamp::now())
            .unwrap_err();
        assert_eq!(err, BookingError::slot_unavailable(h(17)));
    }

    #[test]
    fn each_hour_checked_against_its_own_slot() {
        // Shift change at 10:00: morning holds 2, late morning holds 1.
        let slots = vec![slot(6, 10, 2), slot(10, 12, 1)];
        let existing = vec![confirmed(10, 11)];
        let err = policy()
            .check_slot_capacity(monday(), range(9, 11), &slots, &existing, &Timestamp::now())
            .unwrap_err();
        assert_eq!(err, BookingError::slot_full(h(10), 1));
    }

    #[test]
    fn cancelled_and_stale_pending_bookings_free_capacity() {
        let now = Timestamp::now();
        let slots = vec![slot(17, 19, 2)];
        let existing = vec![
            Occupancy {
                status: BookingStatus::Cancelled,
                ..confirmed(17, 18)
            },
            Occupancy {
                status: BookingStatus::PendingPayment,
                created_at: now.minus(Duration::minutes(30)),
                ..confirmed(17, 18)
            },
            confirmed(17, 18),
        ];
        assert!(policy()
            .check_slot_capacity(monday(), range(17, 18), &slots, &existing, &now)
            .is_ok());
    }

    #[test]
    fn fresh_pending_booking_holds_capacity() {
        let now = Timestamp::now();
        let slots = vec![slot(17, 19, 1)];
        let existing = vec![Occupancy {
            status: BookingStatus::PendingPayment,
            created_at: now.minus(Duration::minutes(5)),
            ..confirmed(17, 18)
        }];
        assert!(policy()
            .check_slot_capacity(monday(), range(17, 18), &slots, &existing, &now)
            .is_err());
    }

    #[test]
    fn hold_lapses_after_window() {
        let now = Timestamp::now();
        assert!(!policy().hold_lapsed(&now.minus(Duration::minutes(5)), &now));
        assert!(policy().hold_lapsed(&now.minus(Duration::minutes(16)), &now));
        assert!(CapacityPolicy::new(Duration::zero()).hold_lapsed(&now, &now));
    }

    #[test]
    fn trainer_overlap_rejected() {
        let calendar = vec![confirmed(10, 12)];
        let err = policy()
            .check_trainer_free(range(11, 13), &calendar, &Timestamp::now())
            .unwrap_err();
        assert_eq!(err, BookingError::trainer_unavailable(range(11, 13), range(10, 12)));
    }

    #[test]
    fn trainer_back_to_back_allowed() {
        let calendar = vec![confirmed(10, 12)];
        assert!(policy()
            .check_trainer_free(range(12, 13), &calendar, &Timestamp::now())
            .is_ok());
        assert!(policy()
            .check_trainer_free(range(8, 10), &calendar, &Timestamp::now())
            .is_ok());
    }

    #[test]
    fn trainer_cancelled_booking_ignored() {
        let calendar = vec![Occupancy {
            status: BookingStatus::Cancelled,
            ..confirmed(10, 12)
        }];
        assert!(policy()
            .check_trainer_free(range(10, 12), &calendar, &Timestamp::now())
            .is_ok());
    }

    #[test]
    fn remaining_by_hour_subtracts_holders() {
        let s = slot(17, 19, 3);
        let existing = vec![confirmed(17, 19), confirmed(18, 19)];
        let remaining = policy().remaining_by_hour(&s, &existing, &Timestamp::now());
        assert_eq!(remaining, vec![(h(17), 2), (h(18), 1)]);
    }
}
