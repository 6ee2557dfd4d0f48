//! Gym catalog endpoints: search, profiles, services, slots, availability.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::Router;

use crate::application::handlers::gym::{
    CreateGymCommand, CreateServiceCommand, CreateSlotCommand, SearchGymsQuery, UpdateGymCommand,
    UpdateServiceCommand, UpdateSlotCommand,
};
use crate::domain::foundation::{GymId, ServiceId, SlotId};
use crate::domain::gym::{GymDetails, NewService, ServiceUpdate, SlotDefinition};

use super::dto::{AvailabilityParams, SearchParams};
use super::error::ApiError;
use super::middleware::RequireAuth;
use super::state::AppState;

/// GET /api/gyms - Two-phase geo search over approved gyms
pub async fn search_gyms(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .search_gyms_handler()
        .handle(SearchGymsQuery {
            latitude: params.lat,
            longitude: params.lng,
            radius_km: params.radius_km,
            city: params.city,
            text: params.q,
        })
        .await?;
    Ok(Json(outcome))
}

/// GET /api/gyms/mine
pub async fn my_gyms(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.gym_queries().mine(&user).await?))
}

/// POST /api/gyms - Submit a gym for approval
pub async fn create_gym(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(details): Json<GymDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let gym = state
        .create_gym_handler()
        .handle(CreateGymCommand { owner: user, details })
        .await?;
    Ok((StatusCode::CREATED, Json(gym)))
}

/// GET /api/gyms/:id
pub async fn get_gym(
    State(state): State<AppState>,
    Path(gym_id): Path<GymId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.gym_queries().get(&gym_id).await?))
}

/// PUT /api/gyms/:id
pub async fn update_gym(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(gym_id): Path<GymId>,
    Json(details): Json<GymDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let gym = state
        .update_gym_handler()
        .handle(UpdateGymCommand { user, gym_id, details })
        .await?;
    Ok(Json(gym))
}

// ════════════════════════════════════════════════════════════════════════════════
// Services
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/gyms/:id/services
pub async fn list_services(
    State(state): State<AppState>,
    Path(gym_id): Path<GymId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.services_handler().list(&gym_id).await?))
}

/// POST /api/gyms/:id/services
pub async fn create_service(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(gym_id): Path<GymId>,
    Json(service): Json<NewService>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state
        .services_handler()
        .create(CreateServiceCommand { user, gym_id, service })
        .await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// PUT /api/gyms/:id/services/:service_id
pub async fn update_service(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((gym_id, service_id)): Path<(GymId, ServiceId)>,
    Json(update): Json<ServiceUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state
        .services_handler()
        .update(UpdateServiceCommand {
            user,
            gym_id,
            service_id,
            update,
        })
        .await?;
    Ok(Json(service))
}

// ════════════════════════════════════════════════════════════════════════════════
// Slots
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/gyms/:id/slots
pub async fn list_slots(
    State(state): State<AppState>,
    Path(gym_id): Path<GymId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.slots_handler().list(&gym_id).await?))
}

/// POST /api/gyms/:id/slots
pub async fn create_slot(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(gym_id): Path<GymId>,
    Json(slot): Json<SlotDefinition>,
) -> Result<impl IntoResponse, ApiError> {
    let slot = state
        .slots_handler()
        .create(CreateSlotCommand { user, gym_id, slot })
        .await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// PUT /api/gyms/:id/slots/:slot_id
pub async fn update_slot(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((gym_id, slot_id)): Path<(GymId, SlotId)>,
    Json(slot): Json<SlotDefinition>,
) -> Result<impl IntoResponse, ApiError> {
    let slot = state
        .slots_handler()
        .update(UpdateSlotCommand {
            user,
            gym_id,
            slot_id,
            slot,
        })
        .await?;
    Ok(Json(slot))
}

/// GET /api/gyms/:id/availability?date=YYYY-MM-DD
pub async fn availability(
    State(state): State<AppState>,
    Path(gym_id): Path<GymId>,
    Query(params): Query<AvailabilityParams>,
) -> Result<impl IntoResponse, ApiError> {
    let slots = state
        .availability_handler()
        .handle(&gym_id, params.date)
        .await?;
    Ok(Json(slots))
}

/// Gym routes, mounted at `/api/gyms`.
///
/// - `GET /` - search (public)
/// - `GET /mine` - caller's gyms
/// - `POST /` - register a gym
/// - `GET|PUT /:id` - profile
/// - `GET|POST /:id/services`, `PUT /:id/services/:service_id`
/// - `GET|POST /:id/slots`, `PUT /:id/slots/:slot_id`
/// - `GET /:id/availability?date=` - remaining places per hour (public)
pub fn gym_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_gyms).post(create_gym))
        .route("/mine", get(my_gyms))
        .route("/:id", get(get_gym).put(update_gym))
        .route("/:id/services", get(list_services).post(create_service))
        .route("/:id/services/:service_id", put(update_service))
        .route("/:id/slots", get(list_slots).post(create_slot))
        .route("/:id/slots/:slot_id", put(update_slot))
        .route("/:id/availability", get(availability))
}
