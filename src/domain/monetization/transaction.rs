use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{Money, Timestamp};

/// What a verified payment paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPurpose {
    Booking,
    TrainerBooking,
    FeaturedListing,
}

impl PaymentPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentPurpose::Booking => "booking",
            PaymentPurpose::TrainerBooking => "trainer_booking",
            PaymentPurpose::FeaturedListing => "featured_listing",
        }
    }
}

/// Audit row written once per verified payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub id: Uuid,
    pub purpose: PaymentPurpose,
    /// Id of the booking, trainer booking or featured listing paid for.
    pub reference_id: Uuid,
    pub order_id: String,
    pub payment_id: String,
    pub amount: Money,
    pub created_at: Timestamp,
}

impl PaymentTransaction {
    pub fn record(
        purpose: PaymentPurpose,
        reference_id: Uuid,
        order_id: impl Into<String>,
        payment_id: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            purpose,
            reference_id,
            order_id: order_id.into(),
            payment_id: payment_id.into(),
            amount,
            created_at: Timestamp::now(),
        }
    }
}
