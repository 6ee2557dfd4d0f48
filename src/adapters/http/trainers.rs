//! Trainer endpoints: registration, rosters, standalone sessions.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

use crate::application::handlers::booking::VerifyPaymentCommand;
use crate::application::handlers::trainer::{
    CreateTrainerBookingCommand, RegisterTrainerCommand, SessionAction,
    UpdateTrainerSessionCommand,
};
use crate::domain::foundation::{CurrentUser, GymId, TrainerBookingId, TrainerId};

use super::dto::{
    CheckoutResponse, CreateTrainerBookingRequest, RegisterTrainerRequest, VerifyPaymentRequest,
};
use super::error::ApiError;
use super::middleware::RequireAuth;
use super::state::AppState;

/// POST /api/trainers - Apply to train at a gym
pub async fn register_trainer(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<RegisterTrainerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let trainer = state
        .register_trainer_handler()
        .handle(RegisterTrainerCommand {
            user,
            gym_id: req.gym_id,
            profile: req.profile,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(trainer)))
}

/// GET /api/trainers/me
pub async fn my_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.trainer_queries().me(&user).await?))
}

/// GET /api/trainers/gym/:gym_id - Approved trainers (public)
pub async fn gym_roster(
    State(state): State<AppState>,
    Path(gym_id): Path<GymId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.trainer_queries().approved_at_gym(&gym_id).await?))
}

/// POST /api/trainers/:id/bookings - Checkout for a standalone session
pub async fn book_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(trainer_id): Path<TrainerId>,
    Json(req): Json<CreateTrainerBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .create_trainer_booking_handler()
        .handle(CreateTrainerBookingCommand {
            user,
            trainer_id,
            date: req.date,
            start_time: req.start_time,
            duration_hours: req.duration_hours,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(CheckoutResponse::from(result))))
}

/// POST /api/trainers/bookings/:id/verify-payment
pub async fn verify_session_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<TrainerBookingId>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .verify_trainer_payment_handler()
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

/// GET /api/trainers/bookings - Sessions the caller booked
pub async fn my_sessions(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.trainer_queries().my_sessions(&user).await?))
}

/// GET /api/trainers/schedule - The calling trainer's calendar
pub async fn schedule(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.trainer_queries().schedule(&user).await?))
}

async fn update_session(
    state: AppState,
    user: CurrentUser,
    booking_id: TrainerBookingId,
    action: SessionAction,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .trainer_session_handler()
        .handle(UpdateTrainerSessionCommand {
            user,
            booking_id,
            action,
        })
        .await?;
    Ok(Json(booking))
}

/// POST /api/trainers/bookings/:id/complete
pub async fn complete_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<TrainerBookingId>,
) -> Result<impl IntoResponse, ApiError> {
    update_session(state, user, id, SessionAction::Complete).await
}

/// POST /api/trainers/bookings/:id/cancel
pub async fn cancel_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<TrainerBookingId>,
) -> Result<impl IntoResponse, ApiError> {
    update_session(state, user, id, SessionAction::Cancel).await
}

/// Trainer routes, mounted at `/api/trainers`.
///
/// - `POST /` - register
/// - `GET /me`, `GET /schedule`
/// - `GET /gym/:gym_id` - public roster
/// - `POST /:id/bookings` - book a session
/// - `GET /bookings` - caller's sessions
/// - `POST /bookings/:id/verify-payment|complete|cancel`
pub fn trainer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register_trainer))
        .route("/me", get(my_profile))
        .route("/schedule", get(schedule))
        .route("/gym/:gym_id", get(gym_roster))
        .route("/bookings", get(my_sessions))
        .route("/bookings/:id/verify-payment", post(verify_session_payment))
        .route("/bookings/:id/complete", post(complete_session))
        .route("/bookings/:id/cancel", post(cancel_session))
        .route("/:id/bookings", post(book_session))
}
