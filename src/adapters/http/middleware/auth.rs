//! Authentication middleware and extractor for axum.
//!
//! - `auth_middleware` validates the bearer token, resolves the local account
//!   and injects `CurrentUser` into request extensions
//! - `RequireAuth` pulls that user back out in handlers
//!
//! ```text
//! Request → auth_middleware → SessionValidator → ResolveUserHandler
//!                                      ↓
//!                              Handler → RequireAuth reads CurrentUser
//! ```
//!
//! Requests without an `Authorization` header pass through untouched, so
//! public routes share the same router.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{ApiError, ErrorResponse};
use crate::application::handlers::user::ResolveUserHandler;
use crate::domain::foundation::{AuthError, CurrentUser};
use crate::ports::SessionValidator;

/// Middleware state: the token validator and the account resolver.
#[derive(Clone)]
pub struct AuthState {
    validator: Arc<dyn SessionValidator>,
    resolver: Arc<ResolveUserHandler>,
}

impl AuthState {
    pub fn new(validator: Arc<dyn SessionValidator>, resolver: Arc<ResolveUserHandler>) -> Self {
        Self { validator, resolver }
    }
}

/// Validates `Authorization: Bearer <token>` and injects `CurrentUser`.
///
/// Invalid or expired tokens are rejected with 401. An unreachable identity
/// provider yields 503.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        return next.run(request).await;
    };

    let claims = match auth.validator.validate(token).await {
        Ok(claims) => claims,
        Err(e) => return auth_failure(&e),
    };

    match auth.resolver.handle(&claims).await {
        Ok(user) => {
            request.extensions_mut().insert(user.to_current_user());
            next.run(request).await
        }
        Err(e) => ApiError(e).into_response(),
    }
}

fn auth_failure(error: &AuthError) -> Response {
    let (status, message) = match error {
        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!(error = %msg, "Auth service unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, "Authentication service unavailable")
        }
    };
    (status, Json(ErrorResponse::new("UNAUTHORIZED", message))).into_response()
}

/// Extractor that requires an authenticated user.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub CurrentUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<CurrentUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid bearer token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("UNAUTHORIZED", "Authentication required")),
            )
                .into_response(),
        }
    }
}
