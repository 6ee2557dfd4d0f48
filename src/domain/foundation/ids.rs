//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a UUID-backed identifier newtype.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id!(
    /// Local user account, mapped from an identity provider subject.
    UserId
);
uuid_id!(
    /// A gym listing.
    GymId
);
uuid_id!(
    /// A bookable service offered by a gym.
    ServiceId
);
uuid_id!(
    /// A recurring weekly time slot of a gym.
    SlotId
);
uuid_id!(
    /// A gym booking (session, pass or membership).
    BookingId
);
uuid_id!(
    /// A trainer profile attached to a gym.
    TrainerId
);
uuid_id!(
    /// A standalone trainer session booking.
    TrainerBookingId
);
uuid_id!(ReviewId);
uuid_id!(
    /// A paid featured-listing purchase.
    FeaturedListingId
);
uuid_id!(PayoutId);
