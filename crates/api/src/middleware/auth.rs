//! Authentication middleware for protected routes.

use assessoria_shared::{AdvisorId, Claims, JwtError};
use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn reject(status: StatusCode, error: &str, message: &str) -> Response {
    (status, Json(json!({ "error": error, "message": message }))).into_response()
}

/// Authentication middleware that validates provider-issued JWTs.
///
/// Valid claims are stored in request extensions. Tokens for emails
/// outside the allowed domain are refused even when correctly signed.
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
        return reject(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Authorization header with Bearer token is required",
        );
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            if !state.auth.is_allowed_email(&claims.email) {
                tracing::warn!(user_id = %claims.sub, "token for email outside allowed domain");
                return reject(
                    StatusCode::FORBIDDEN,
                    "FORBIDDEN",
                    "Email domain is not allowed",
                );
            }
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => {
            reject(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "Token has expired")
        }
        Err(e) => {
            tracing::debug!(error = %e, "rejected token");
            reject(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid or malformed token",
            )
        }
    }
}

/// Extractor for the authenticated advisor.
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     let advisor = user.advisor_id();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the advisor ID from the claims.
    #[must_use]
    pub const fn advisor_id(&self) -> AdvisorId {
        AdvisorId::from_uuid(self.0.sub)
    }

    /// Returns the inner claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.0
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
            .ok_or_else(|| {
                reject(
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Authentication required",
                )
            })
    }
}
