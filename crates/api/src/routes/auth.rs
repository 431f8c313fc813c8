//! Authentication routes for login, sign-up, and token refresh.
//!
//! Credentials are checked by the identity provider. This service only
//! gates the email domain and shapes the responses.

use assessoria_shared::AppError;
use assessoria_shared::auth::{LoginRequest, RefreshRequest, SessionTokens, SignupRequest};
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Shortest password forwarded to the provider.
const MIN_PASSWORD_LEN: usize = 6;

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/refresh", post(refresh))
}

/// Response for a created account.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// Provider user ID (also the profile ID).
    pub id: Uuid,
    /// Normalized email.
    pub email: String,
}

fn ensure_allowed(state: &AppState, email: &str) -> Result<(), AppError> {
    if state.auth.is_allowed_email(email) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "only @{} emails may sign in",
            state.auth.allowed_domain
        )))
    }
}

/// POST /auth/login - Authenticate with the identity provider.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<SessionTokens>> {
    ensure_allowed(&state, &payload.email)?;

    let email = payload.email.trim().to_lowercase();
    let tokens = state
        .identity
        .sign_in_with_password(&email, &payload.password)
        .await?;

    info!(email = %email, "advisor signed in");
    Ok(Json(tokens))
}

/// POST /auth/signup - Create an advisor account.
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    ensure_allowed(&state, &payload.email)?;

    if payload.nome.trim().is_empty() {
        return Err(AppError::Validation("nome is required".to_string()).into());
    }
    if payload.codigo_xp.trim().is_empty() {
        return Err(AppError::Validation("codigo_xp is required".to_string()).into());
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ))
        .into());
    }

    let id = state.identity.create_user(&payload).await?;
    let email = payload.email.trim().to_lowercase();

    info!(user_id = %id, "advisor account created");
    Ok((StatusCode::CREATED, Json(SignupResponse { id, email })))
}

/// POST /auth/refresh - Exchange a refresh token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<SessionTokens>> {
    if payload.refresh_token.trim().is_empty() {
        return Err(AppError::Validation("refresh_token is required".to_string()).into());
    }
    Ok(Json(state.identity.refresh(&payload.refresh_token).await?))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rstest::rstest;
    use serde_json::json;

    use crate::routes::test_support::{app, json_body, send};

    fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[rstest]
    #[case("someone@gmail.com")]
    #[case("advisor@svninvest.com.br.evil.com")]
    #[tokio::test]
    async fn test_login_rejects_other_domains(#[case] email: &str) {
        let response = send(
            app(),
            post("/api/v1/auth/login", json!({ "email": email, "password": "secret123" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["error"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_signup_requires_advisor_code() {
        let response = send(
            app(),
            post(
                "/api/v1/auth/signup",
                json!({
                    "nome": "Ana",
                    "email": "ana@svninvest.com.br",
                    "codigo_xp": "  ",
                    "password": "secret123"
                }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let response = send(
            app(),
            post(
                "/api/v1/auth/signup",
                json!({
                    "nome": "Ana",
                    "email": "ana@svninvest.com.br",
                    "codigo_xp": "A1",
                    "password": "123"
                }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_with_unreachable_provider_is_bad_gateway() {
        let response = send(
            app(),
            post(
                "/api/v1/auth/login",
                json!({ "email": "ana@svninvest.com.br", "password": "secret123" }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
