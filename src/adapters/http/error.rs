//! HTTP error mapping.
//!
//! Every handler returns `Result<_, ApiError>`. The status comes from the
//! `ErrorCode`; infrastructure failures are logged and replaced by a generic
//! message so database or gateway details never reach clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Body of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// Wrapper that turns a `DomainError` into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn bad_request(field: &str, message: impl Into<String>) -> Self {
        Self(DomainError::validation(field, message))
    }

    fn status(&self) -> StatusCode {
        let code = self.0.code;
        if code.is_not_found() {
            return StatusCode::NOT_FOUND;
        }
        if code.is_internal() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        match code {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = self.0;

        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = %err.code, error = %err.message, "Request failed");
            ErrorResponse::new(err.code.to_string(), "Internal server error")
        } else {
            let details = (!err.details.is_empty()).then(|| {
                serde_json::Value::Object(
                    err.details
                        .into_iter()
                        .map(|(k, v)| (k, serde_json::Value::String(v)))
                        .collect(),
                )
            });
            ErrorResponse {
                code: err.code.to_string(),
                message: err.message,
                details,
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(code: ErrorCode) -> StatusCode {
        ApiError(DomainError::new(code, "x")).into_response().status()
    }

    #[test]
    fn conflicts_and_validation_map_to_400() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::SlotFull,
            ErrorCode::TrainerUnavailable,
            ErrorCode::PaymentSignatureInvalid,
            ErrorCode::InvalidStateTransition,
            ErrorCode::ReviewAlreadyExists,
        ] {
            assert_eq!(status_of(code), StatusCode::BAD_REQUEST, "{}", code);
        }
    }

    #[test]
    fn auth_codes_map_to_401_and_403() {
        assert_eq!(status_of(ErrorCode::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ErrorCode::Forbidden), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(status_of(ErrorCode::BookingNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ErrorCode::GymNotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn infrastructure_maps_to_500() {
        assert_eq!(status_of(ErrorCode::DatabaseError), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of(ErrorCode::PaymentGatewayError), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_omits_empty_details() {
        let json = serde_json::to_string(&ErrorResponse::new("NOT_FOUND", "Not found")).unwrap();
        assert!(!json.contains("details"));
    }
}
