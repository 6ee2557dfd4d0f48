//! Whole-hour time-of-day values shared by slots and bookings.
//!
//! Slots and bookings are aligned to whole hours, so times are stored as an
//! hour number `0..=24`. `24` only appears as an exclusive end.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// An hour boundary of the day, rendered as `HH:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hour(u8);

impl Hour {
    pub const MIDNIGHT: Hour = Hour(0);
    pub const END_OF_DAY: Hour = Hour(24);

    pub fn try_new(hour: u8) -> Result<Self, ValidationError> {
        if hour > 24 {
            return Err(ValidationError::out_of_range("hour", 0, 24, i64::from(hour)));
        }
        Ok(Self(hour))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Wall-clock time; `24:00` maps to the following midnight and so has no
    /// `NaiveTime`.
    pub fn as_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(u32::from(self.0), 0, 0)
    }

    fn offset(&self, hours: u8) -> Result<Self, ValidationError> {
        Hour::try_new(self.0.saturating_add(hours))
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl FromStr for Hour {
    type Err = ValidationError;

    /// Accepts `HH:MM` or `HH:MM:SS`; minutes and seconds must be zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let bad = || ValidationError::invalid_format("time", format!("'{}' is not HH:MM", s));
        let hour: u8 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let minute = parts.next().ok_or_else(bad)?;
        let second = parts.next();
        if parts.next().is_some() {
            return Err(bad());
        }
        if minute != "00" || second.map_or(false, |s| s != "00") {
            return Err(ValidationError::invalid_format(
                "time",
                format!("'{}' must be on a whole hour", s),
            ));
        }
        Hour::try_new(hour)
    }
}

impl TryFrom<String> for Hour {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Hour> for String {
    fn from(hour: Hour) -> String {
        hour.to_string()
    }
}

/// Half-open interval `[start, end)` of whole hours within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HourRange {
    pub start: Hour,
    pub end: Hour,
}

impl HourRange {
    pub fn try_new(start: Hour, end: Hour) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::invalid_format(
                "end_time",
                format!("end {} must be after start {}", end, start),
            ));
        }
        Ok(Self { start, end })
    }

    /// Range starting at `start` lasting `hours`; may not cross midnight.
    pub fn starting_at(start: Hour, hours: u8) -> Result<Self, ValidationError> {
        if hours == 0 {
            return Err(ValidationError::out_of_range("duration_hours", 1, 24, 0));
        }
        let end = start.offset(hours).map_err(|_| {
            ValidationError::invalid_format("duration_hours", "booking may not cross midnight")
        })?;
        Self::try_new(start, end)
    }

    pub fn duration_hours(&self) -> u8 {
        self.end.0 - self.start.0
    }

    /// True when `hour` falls inside `[start, end)`.
    pub fn contains(&self, hour: Hour) -> bool {
        self.start <= hour && hour < self.end
    }

    /// Half-open intersection; ranges that only touch do not overlap.
    pub fn overlaps(&self, other: &HourRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Each hour boundary at which occupancy must be checked: `start`,
    /// `start + 1h`, ... up to but excluding `end`.
    pub fn checkpoints(&self) -> impl Iterator<Item = Hour> {
        (self.start.0..self.end.0).map(Hour)
    }
}

impl<'de> Deserialize<'de> for HourRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            start: Hour,
            end: Hour,
        }
        let raw = Raw::deserialize(deserializer)?;
        HourRange::try_new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for HourRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Day of week, 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub fn try_new(day: i16) -> Result<Self, ValidationError> {
        if !(0..=6).contains(&day) {
            return Err(ValidationError::out_of_range("day_of_week", 0, 6, i64::from(day)));
        }
        Ok(Self(day as u8))
    }

    pub fn of(date: NaiveDate) -> Self {
        Self(date.weekday().num_days_from_sunday() as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i16> for DayOfWeek {
    type Error = ValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        DayOfWeek::try_new(value)
    }
}

impl From<DayOfWeek> for i16 {
    fn from(day: DayOfWeek) -> i16 {
        i16::from(day.0)
    }
}
