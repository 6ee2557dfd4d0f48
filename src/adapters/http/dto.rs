//! Request and response bodies that do not map one-to-one onto domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::handlers::booking::{CheckoutResult, RedeemResult};
use crate::domain::booking::{Booking, Redemption};
use crate::domain::foundation::{
    ApprovalStatus, BookingId, DomainError, GymId, Hour, Money, ServiceId, TrainerBookingId,
    TrainerId,
};
use crate::domain::monetization::{FeaturedListing, Payee};
use crate::domain::review::ReviewSource;
use crate::domain::trainer::TrainerProfile;
use crate::ports::PaymentOrder;

use super::error::ApiError;

// ════════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════════

/// What the client needs to open the gateway's checkout widget.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse<T> {
    pub booking: T,
    pub order: PaymentOrder,
    pub key_id: String,
}

impl<T> From<CheckoutResult<T>> for CheckoutResponse<T> {
    fn from(result: CheckoutResult<T>) -> Self {
        Self {
            booking: result.booking,
            order: result.order,
            key_id: result.key_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeaturedCheckoutResponse {
    pub listing: FeaturedListing,
    pub order: PaymentOrder,
    pub key_id: String,
}

impl From<CheckoutResult<FeaturedListing>> for FeaturedCheckoutResponse {
    fn from(result: CheckoutResult<FeaturedListing>) -> Self {
        Self {
            listing: result.booking,
            order: result.order,
            key_id: result.key_id,
        }
    }
}

/// Payment confirmation posted back by the checkout widget. Accepts the
/// gateway's `razorpay_*` field names as aliases.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Bookings
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub start_time: Option<Hour>,
    pub duration_hours: Option<u8>,
    pub trainer_id: Option<TrainerId>,
}

#[derive(Debug, Deserialize)]
pub struct RedeemByTokenRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    #[serde(flatten)]
    pub redemption: Redemption,
    pub booking: Booking,
}

impl From<RedeemResult> for RedeemResponse {
    fn from(result: RedeemResult) -> Self {
        Self {
            redemption: result.redemption,
            booking: result.booking,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DateFilter {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub date: NaiveDate,
}

// ════════════════════════════════════════════════════════════════════════════════
// Gyms
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(alias = "latitude")]
    pub lat: Option<f64>,
    #[serde(alias = "longitude", alias = "lon")]
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    pub city: Option<String>,
    #[serde(alias = "search")]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

impl StatusFilter {
    pub fn parse(&self) -> Result<Option<ApprovalStatus>, ApiError> {
        match self.status.as_deref() {
            None | Some("") | Some("all") => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|e: crate::domain::foundation::ValidationError| ApiError(e.into())),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Trainers
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct RegisterTrainerRequest {
    pub gym_id: GymId,
    #[serde(flatten)]
    pub profile: TrainerProfile,
}

#[derive(Debug, Deserialize)]
pub struct CreateTrainerBookingRequest {
    pub date: NaiveDate,
    pub start_time: Hour,
    pub duration_hours: Option<u8>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Reviews
// ════════════════════════════════════════════════════════════════════════════════

/// Exactly one of `booking_id` and `trainer_booking_id` must be set.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub booking_id: Option<BookingId>,
    pub trainer_booking_id: Option<TrainerBookingId>,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

impl CreateReviewRequest {
    pub fn source(&self) -> Result<ReviewSource, ApiError> {
        match (self.booking_id, self.trainer_booking_id) {
            (Some(id), None) => Ok(ReviewSource::Booking(id)),
            (None, Some(id)) => Ok(ReviewSource::TrainerBooking(id)),
            _ => Err(ApiError::bad_request(
                "booking_id",
                "Provide exactly one of booking_id or trainer_booking_id",
            )),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Monetization
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub days: u32,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub days: u32,
    pub amount: Money,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseFeaturedRequest {
    pub gym_id: GymId,
    pub days: u32,
}

#[derive(Debug, Deserialize)]
pub struct RecordPayoutRequest {
    pub payee_type: String,
    pub payee_id: Uuid,
    pub amount: Money,
    #[serde(default)]
    pub reference: String,
}

#[derive(Debug, Deserialize)]
pub struct PayoutFilter {
    pub payee_type: Option<String>,
    pub payee_id: Option<Uuid>,
}

impl PayoutFilter {
    pub fn payee(&self) -> Result<Option<Payee>, ApiError> {
        match (self.payee_type.as_deref(), self.payee_id) {
            (None, None) => Ok(None),
            (Some(kind), Some(id)) => parse_payee(kind, id).map(Some),
            _ => Err(ApiError::bad_request(
                "payee_id",
                "payee_type and payee_id must be given together",
            )),
        }
    }
}

pub fn parse_payee(kind: &str, id: Uuid) -> Result<Payee, ApiError> {
    match kind {
        "gym" => Ok(Payee::Gym(GymId::from_uuid(id))),
        "trainer" => Ok(Payee::Trainer(TrainerId::from_uuid(id))),
        other => Err(ApiError(DomainError::validation(
            "payee_type",
            format!("unknown payee type '{}'", other),
        ))),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_request_needs_exactly_one_source() {
        let both: CreateReviewRequest = serde_json::from_value(serde_json::json!({
            "booking_id": Uuid::new_v4(),
            "trainer_booking_id": Uuid::new_v4(),
            "rating": 5
        }))
        .unwrap();
        assert!(both.source().is_err());

        let one: CreateReviewRequest = serde_json::from_value(serde_json::json!({
            "booking_id": Uuid::new_v4(),
            "rating": 4,
            "comment": "Clean and friendly"
        }))
        .unwrap();
        assert!(matches!(one.source().unwrap(), ReviewSource::Booking(_)));
    }

    #[test]
    fn verify_request_accepts_gateway_field_names() {
        let req: VerifyPaymentRequest = serde_json::from_value(serde_json::json!({
            "razorpay_order_id": "order_1",
            "razorpay_payment_id": "pay_1",
            "razorpay_signature": "abc"
        }))
        .unwrap();
        assert_eq!(req.order_id, "order_1");
        assert_eq!(req.signature, "abc");
    }

    #[test]
    fn status_filter_parses_known_values() {
        let filter = StatusFilter { status: Some("pending".to_string()) };
        assert_eq!(filter.parse().unwrap(), Some(ApprovalStatus::Pending));
        assert_eq!(StatusFilter { status: None }.parse().unwrap(), None);
        assert!(StatusFilter { status: Some("maybe".to_string()) }.parse().is_err());
    }

    #[test]
    fn payout_filter_requires_both_halves() {
        let id = Uuid::new_v4();
        let filter = PayoutFilter { payee_type: Some("gym".to_string()), payee_id: Some(id) };
        assert_eq!(filter.payee().unwrap(), Some(Payee::Gym(GymId::from_uuid(id))));
        let half = PayoutFilter { payee_type: None, payee_id: Some(id) };
        assert!(half.payee().is_err());
        assert!(parse_payee("member", id).is_err());
    }
}
