//! Star rating value object (1 to 5).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Review score: 1 (poor) to 5 (excellent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Creates a Rating, returning error if out of range.
    pub fn try_new(value: i32) -> Result<Self, ValidationError> {
        if value < i32::from(Self::MIN) || value > i32::from(Self::MAX) {
            return Err(ValidationError::out_of_range(
                "rating",
                i64::from(Self::MIN),
                i64::from(Self::MAX),
                i64::from(value),
            ));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for Rating {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Rating::try_new(value)
    }
}

impl From<Rating> for i32 {
    fn from(rating: Rating) -> i32 {
        i32::from(rating.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

/// Aggregate score of a gym or trainer, recomputed from all its reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Mean rating rounded to two decimals; 0 when there are no reviews.
    pub average: f64,
    pub total_reviews: i64,
}

impl RatingSummary {
    /// Computes the summary from individual ratings.
    pub fn from_ratings<I: IntoIterator<Item = Rating>>(ratings: I) -> Self {
        let (sum, count) = ratings
            .into_iter()
            .fold((0i64, 0i64), |(s, c), r| (s + i64::from(r.value()), c + 1));
        if count == 0 {
            return Self::default();
        }
        let average = ((sum as f64 / count as f64) * 100.0).round() / 100.0;
        Self {
            average,
            total_reviews: count,
        }
    }
}
