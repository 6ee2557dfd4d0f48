//! Featured listing purchase endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

use crate::application::handlers::booking::VerifyPaymentCommand;
use crate::application::handlers::monetization::PurchaseFeaturedCommand;
use crate::domain::foundation::FeaturedListingId;

use super::dto::{
    FeaturedCheckoutResponse, PurchaseFeaturedRequest, QuoteParams, QuoteResponse,
    VerifyPaymentRequest,
};
use super::error::ApiError;
use super::middleware::RequireAuth;
use super::state::AppState;

/// GET /api/monetization/featured/quote?days=
pub async fn quote(
    State(state): State<AppState>,
    Query(params): Query<QuoteParams>,
) -> Result<impl IntoResponse, ApiError> {
    let amount = state.featured_handler().quote(params.days).await?;
    Ok(Json(QuoteResponse {
        days: params.days,
        amount,
    }))
}

/// POST /api/monetization/featured
pub async fn purchase(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<PurchaseFeaturedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .featured_handler()
        .purchase(PurchaseFeaturedCommand {
            user,
            gym_id: req.gym_id,
            days: req.days,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(FeaturedCheckoutResponse::from(result))))
}

/// POST /api/monetization/featured/:id/verify-payment
pub async fn verify_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<FeaturedListingId>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state
        .featured_handler()
        .verify(VerifyPaymentCommand {
            user,
            id,
            order_id: req.order_id,
            payment_id: req.payment_id,
            signature: req.signature,
        })
        .await?;
    Ok(Json(listing))
}

/// Monetization routes, mounted at `/api/monetization`.
pub fn monetization_routes() -> Router<AppState> {
    Router::new()
        .route("/featured/quote", get(quote))
        .route("/featured", post(purchase))
        .route("/featured/:id/verify-payment", post(verify_payment))
}
