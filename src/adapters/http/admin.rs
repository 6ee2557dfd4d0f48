//! Gym-owner and super-admin endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

use crate::application::handlers::gym::{ModerateGymCommand, Moderation};
use crate::application::handlers::monetization::RecordPayoutCommand;
use crate::application::handlers::trainer::ModerateTrainerCommand;
use crate::domain::foundation::{CurrentUser, GymId, TrainerId};
use crate::domain::settings::SettingsUpdate;

use super::dto::{parse_payee, DateFilter, PayoutFilter, RecordPayoutRequest, StatusFilter};
use super::error::ApiError;
use super::middleware::RequireAuth;
use super::state::AppState;

// ════════════════════════════════════════════════════════════════════════════════
// Gym owner
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/gyms/:id/bookings?date=
pub async fn gym_bookings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(gym_id): Path<GymId>,
    Query(filter): Query<DateFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = state
        .booking_queries()
        .for_gym(&user, &gym_id, filter.date)
        .await?;
    Ok(Json(bookings))
}

/// GET /api/admin/gyms/:id/earnings
pub async fn gym_earnings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(gym_id): Path<GymId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.payout_handler().gym_earnings(&user, &gym_id).await?))
}

/// GET /api/admin/gyms/:id/trainers - Roster including pending applications
pub async fn gym_trainers(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(gym_id): Path<GymId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.trainer_queries().for_gym(&user, &gym_id).await?))
}

async fn moderate_trainer(
    state: AppState,
    user: CurrentUser,
    trainer_id: TrainerId,
    decision: Moderation,
) -> Result<impl IntoResponse, ApiError> {
    let trainer = state
        .moderate_trainer_handler()
        .handle(ModerateTrainerCommand {
            user,
            trainer_id,
            decision,
        })
        .await?;
    Ok(Json(trainer))
}

/// POST /api/admin/trainers/:id/approve
pub async fn approve_trainer(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<TrainerId>,
) -> Result<impl IntoResponse, ApiError> {
    moderate_trainer(state, user, id, Moderation::Approve).await
}

/// POST /api/admin/trainers/:id/reject
pub async fn reject_trainer(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<TrainerId>,
) -> Result<impl IntoResponse, ApiError> {
    moderate_trainer(state, user, id, Moderation::Reject).await
}

/// Gym-owner routes, mounted at `/api/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/gyms/:id/bookings", get(gym_bookings))
        .route("/gyms/:id/earnings", get(gym_earnings))
        .route("/gyms/:id/trainers", get(gym_trainers))
        .route("/trainers/:id/approve", post(approve_trainer))
        .route("/trainers/:id/reject", post(reject_trainer))
}

// ════════════════════════════════════════════════════════════════════════════════
// Super-admin
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/super-admin/gyms?status=pending
pub async fn gyms_by_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let status = filter.parse()?;
    Ok(Json(state.gym_queries().by_status(&user, status).await?))
}

async fn moderate_gym(
    state: AppState,
    user: CurrentUser,
    gym_id: GymId,
    decision: Moderation,
) -> Result<impl IntoResponse, ApiError> {
    let gym = state
        .moderate_gym_handler()
        .handle(ModerateGymCommand {
            user,
            gym_id,
            decision,
        })
        .await?;
    Ok(Json(gym))
}

/// POST /api/super-admin/gyms/:id/approve
pub async fn approve_gym(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<GymId>,
) -> Result<impl IntoResponse, ApiError> {
    moderate_gym(state, user, id, Moderation::Approve).await
}

/// POST /api/super-admin/gyms/:id/reject
pub async fn reject_gym(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<GymId>,
) -> Result<impl IntoResponse, ApiError> {
    moderate_gym(state, user, id, Moderation::Reject).await
}

/// GET /api/super-admin/settings
pub async fn get_settings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.settings_handler().get(&user).await?))
}

/// PUT /api/super-admin/settings
pub async fn update_settings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(update): Json<SettingsUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.settings_handler().update(&user, update).await?))
}

/// GET /api/super-admin/payouts?payee_type=&payee_id=
pub async fn list_payouts(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<PayoutFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let payee = filter.payee()?;
    Ok(Json(state.payout_handler().list(&user, payee).await?))
}

/// POST /api/super-admin/payouts
pub async fn record_payout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<RecordPayoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payee = parse_payee(&req.payee_type, req.payee_id)?;
    let payout = state
        .payout_handler()
        .record(RecordPayoutCommand {
            user,
            payee,
            amount: req.amount,
            reference: req.reference,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(payout)))
}

/// GET /api/super-admin/stats
pub async fn platform_stats(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.payout_handler().platform_stats(&user).await?))
}

/// Super-admin routes, mounted at `/api/super-admin`. Every handler checks
/// the role through the application layer.
pub fn super_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/gyms", get(gyms_by_status))
        .route("/gyms/:id/approve", post(approve_gym))
        .route("/gyms/:id/reject", post(reject_gym))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/payouts", get(list_payouts).post(record_payout))
        .route("/stats", get(platform_stats))
}
