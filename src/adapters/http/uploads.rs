//! Image upload endpoint.

use axum::extract::{DefaultBodyLimit, Json, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;

use crate::ports::MediaUpload;

use super::error::ApiError;
use super::middleware::RequireAuth;
use super::state::AppState;

/// Allowance for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// POST /api/uploads - multipart form with a `file` field
pub async fn upload(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request("file", e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request("file", e.body_text()))?;

        let stored = state
            .upload_handler()
            .handle(
                &user,
                MediaUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                },
            )
            .await?;
        return Ok((StatusCode::CREATED, Json(stored)));
    }

    Err(ApiError::bad_request("file", "Missing multipart field 'file'"))
}

/// Upload routes, mounted at `/api/uploads`. Bodies are capped just above
/// `max_upload_bytes`.
pub fn upload_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD))
}
