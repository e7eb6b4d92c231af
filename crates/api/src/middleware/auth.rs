//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use cogniflow_shared::jwt::JwtError;
use cogniflow_shared::types::UserId;
use cogniflow_shared::{Claims, Role};
use serde_json::json;

use crate::{ApiError, AppState};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(error: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": error, "message": message })),
    )
        .into_response()
}

/// Validates the bearer token and stores its claims in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized(
            "MISSING_TOKEN",
            "Authorization header with Bearer token is required",
        );
    };

    match state.jwt_service.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => unauthorized("TOKEN_EXPIRED", "Token has expired"),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthorized("INVALID_TOKEN", "Invalid or malformed token")
        }
    }
}

/// Extractor for authenticated user claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The acting user, as recorded on created rows and audit logs.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0.sub
    }

    /// Returns the user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.0.role
    }

    /// Admin-only actions: account creation and the audit trail.
    pub fn require_admin(&self, action: &str) -> Result<(), ApiError> {
        if self.role().is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden(action))
        }
    }

    /// Bookkeeping actions, open to admins and accountants.
    pub fn require_booker(&self, action: &str) -> Result<(), ApiError> {
        if self.role().can_book() {
            Ok(())
        } else {
            Err(ApiError::forbidden(action))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| unauthorized("UNAUTHORIZED", "Authentication required"))
    }
}
