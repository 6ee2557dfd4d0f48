//! Gym booking endpoints: checkout, payment confirmation, redemption.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

use crate::application::handlers::booking::{
    CancelBookingCommand, CreateBookingCommand, RedeemBookingCommand, RedeemTarget,
    VerifyPaymentCommand,
};
use crate::domain::foundation::BookingId;

use super::dto::{
    CheckoutResponse, CreateBookingRequest, RedeemByTokenRequest, RedeemResponse,
    VerifyPaymentRequest,
};
use super::error::ApiError;
use super::middleware::RequireAuth;
use super::state::AppState;

/// POST /api/bookings - Price a booking and open a payment order
pub async fn create_booking(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .create_booking_handler()
        .handle(CreateBookingCommand {
            user,
            service_id: req.service_id,
            date: req.date,
            start_time: req.start_time,
            duration_hours: req.duration_hours,
            trainer_id: req.trainer_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(CheckoutResponse::from(result))))
}

/// POST /api/bookings/:id/verify-payment
pub async fn verify_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<BookingId>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .verify_booking_payment_handler()
        .handle(VerifyPaymentCommand {
            user,
            id,
            order_id: req.order_id,
            payment_id: req.payment_id,
            signature: req.signature,
        })
        .await?;
    Ok(Json(booking))
}

/// GET /api/bookings - Caller's bookings, newest first
pub async fn my_bookings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.booking_queries().mine(&user).await?))
}

/// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<BookingId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.booking_queries().get(&user, &id).await?))
}

/// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(booking_id): Path<BookingId>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .cancel_booking_handler()
        .handle(CancelBookingCommand { user, booking_id })
        .await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/redeem - Check-in by booking id
pub async fn redeem_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<BookingId>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .redeem_booking_handler()
        .handle(RedeemBookingCommand {
            user,
            target: RedeemTarget::Id(id),
        })
        .await?;
    Ok(Json(RedeemResponse::from(result)))
}

/// POST /api/bookings/redeem - Check-in by scanned QR token
pub async fn redeem_by_token(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<RedeemByTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .redeem_booking_handler()
        .handle(RedeemBookingCommand {
            user,
            target: RedeemTarget::Token(req.token),
        })
        .await?;
    Ok(Json(RedeemResponse::from(result)))
}

/// Booking routes, mounted at `/api/bookings`. All require authentication.
///
/// - `POST /` - checkout
/// - `GET /` - caller's bookings
/// - `POST /redeem` - redeem by QR token (gym owner)
/// - `GET /:id`
/// - `POST /:id/verify-payment`
/// - `POST /:id/cancel`
/// - `POST /:id/redeem` - redeem by id (gym owner)
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(my_bookings).post(create_booking))
        .route("/redeem", post(redeem_by_token))
        .route("/:id", get(get_booking))
        .route("/:id/verify-payment", post(verify_payment))
        .route("/:id/cancel", post(cancel_booking))
        .route("/:id/redeem", post(redeem_by_id))
}
