//! Review endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

use crate::application::handlers::review::CreateReviewCommand;
use crate::domain::foundation::{GymId, TrainerId};
use crate::domain::review::ReviewTarget;

use super::dto::CreateReviewRequest;
use super::error::ApiError;
use super::middleware::RequireAuth;
use super::state::AppState;

/// POST /api/reviews - Review a used booking or completed session
pub async fn create_review(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let source = req.source()?;
    let created = state
        .create_review_handler()
        .handle(CreateReviewCommand {
            user,
            source,
            rating: req.rating,
            comment: req.comment,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/reviews/gym/:id
pub async fn gym_reviews(
    State(state): State<AppState>,
    Path(id): Path<GymId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.review_queries().for_target(&ReviewTarget::Gym(id)).await?))
}

/// GET /api/reviews/trainer/:id
pub async fn trainer_reviews(
    State(state): State<AppState>,
    Path(id): Path<TrainerId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.review_queries().for_target(&ReviewTarget::Trainer(id)).await?))
}

/// Review routes, mounted at `/api/reviews`. Listings are public.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_review))
        .route("/gym/:id", get(gym_reviews))
        .route("/trainer/:id", get(trainer_reviews))
}
