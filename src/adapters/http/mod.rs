//! HTTP adapter - the JSON API.
//!
//! One module per area, each exposing its handlers and a `*_routes()`
//! builder. `api_router` nests them under `/api`, adds `/health`, and wraps
//! everything in the auth middleware.

mod admin;
mod bookings;
pub mod dto;
pub mod error;
mod gyms;
pub mod middleware;
mod monetization;
mod reviews;
mod state;
mod trainers;
mod uploads;

use axum::extract::Json;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

pub use error::{ApiError, ErrorResponse};
pub use middleware::{auth_middleware, AuthState, RequireAuth};
pub use state::{AppState, HttpLimits};

use dto::HealthResponse;

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/me - The resolved local account
pub async fn me(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    Json(user)
}

/// Builds the complete application router.
///
/// # Routes
/// - `GET /health`
/// - `GET /api/me`
/// - `/api/gyms`, `/api/bookings`, `/api/trainers`, `/api/reviews`
/// - `/api/admin` (gym owners), `/api/super-admin`
/// - `/api/monetization`, `/api/uploads`
pub fn api_router(state: AppState) -> Router {
    let auth = state.auth_state();
    let api = Router::new()
        .route("/me", get(me))
        .nest("/gyms", gyms::gym_routes())
        .nest("/bookings", bookings::booking_routes())
        .nest("/trainers", trainers::trainer_routes())
        .nest("/reviews", reviews::review_routes())
        .nest("/admin", admin::admin_routes())
        .nest("/super-admin", admin::super_admin_routes())
        .nest("/monetization", monetization::monetization_routes())
        .nest("/uploads", uploads::upload_routes(state.limits.max_upload_bytes));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(axum::middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state)
}
