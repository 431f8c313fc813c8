//! Client for the hosted identity provider (GoTrue).
//!
//! Passwords never touch this service's database. Sign-in is a password
//! grant sent with the anon key; sign-up goes through the admin endpoint
//! with the service-role key so the account is confirmed immediately and
//! carries the metadata the profile trigger reads.

use assessoria_shared::auth::{SessionTokens, SignupRequest};
use assessoria_shared::config::SupabaseConfig;
use assessoria_shared::{AppError, AppResult};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// Identity provider client.
#[derive(Clone)]
pub struct GoTrueClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_role_key: String,
}

impl std::fmt::Debug for GoTrueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoTrueClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct CreatedUser {
    id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderError {
    #[serde(default, alias = "error_description", alias = "msg")]
    message: Option<String>,
}

impl GoTrueClient {
    /// Creates a client from configuration.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    /// Creates a client with a custom HTTP client.
    #[must_use]
    pub fn with_http(http: reqwest::Client, config: &SupabaseConfig) -> Self {
        Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.base_url)
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for rejected credentials and
    /// `ExternalService` if the provider cannot be reached.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<SessionTokens> {
        let response = self
            .http
            .post(self.url("/token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(unreachable_provider)?;

        token_response(response, "invalid email or password").await
    }

    /// Exchanges a refresh token for a new session.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for a stale token and `ExternalService` if the
    /// provider cannot be reached.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<SessionTokens> {
        let response = self
            .http
            .post(self.url("/token?grant_type=refresh_token"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(unreachable_provider)?;

        token_response(response, "refresh token is invalid or expired").await
    }

    /// Creates a confirmed user carrying `nome` and `codigo_xp` metadata.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the email is taken, `Validation` for a
    /// rejected password, and `ExternalService` otherwise.
    pub async fn create_user(&self, request: &SignupRequest) -> AppResult<Uuid> {
        let response = self
            .http
            .post(self.url("/admin/users"))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&json!({
                "email": request.email.trim().to_lowercase(),
                "password": request.password,
                "email_confirm": true,
                "user_metadata": {
                    "nome": request.nome.trim(),
                    "codigo_xp": request.codigo_xp.trim(),
                },
            }))
            .send()
            .await
            .map_err(unreachable_provider)?;

        let status = response.status();
        if status.is_success() {
            let user: CreatedUser = response.json().await.map_err(unreachable_provider)?;
            return Ok(user.id);
        }

        let detail = error_message(response).await;
        Err(match status {
            StatusCode::CONFLICT => AppError::Conflict("email already registered".to_string()),
            StatusCode::UNPROCESSABLE_ENTITY if detail.contains("registered") => {
                AppError::Conflict("email already registered".to_string())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::Validation(detail)
            }
            _ => provider_failure(status, &detail),
        })
    }
}

async fn token_response(response: reqwest::Response, rejected: &str) -> AppResult<SessionTokens> {
    let status = response.status();
    if status.is_success() {
        let tokens: TokenResponse = response.json().await.map_err(unreachable_provider)?;
        return Ok(SessionTokens {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        });
    }

    let detail = error_message(response).await;
    if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
        tracing::info!(status = status.as_u16(), detail = %detail, "identity provider rejected credentials");
        return Err(AppError::Unauthorized(rejected.to_string()));
    }
    Err(provider_failure(status, &detail))
}

async fn error_message(response: reqwest::Response) -> String {
    response
        .json::<ProviderError>()
        .await
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_default()
}

fn provider_failure(status: StatusCode, detail: &str) -> AppError {
    tracing::error!(status = status.as_u16(), detail = %detail, "identity provider error");
    AppError::ExternalService(format!("identity provider returned {status}"))
}

#[allow(clippy::needless_pass_by_value)]
fn unreachable_provider(err: reqwest::Error) -> AppError {
    tracing::error!(error = %err, "identity provider request failed");
    AppError::ExternalService("identity provider unavailable".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> SupabaseConfig {
        SupabaseConfig {
            url: url.to_string(),
            anon_key: "anon".to_string(),
            service_role_key: "service".to_string(),
            jwt_secret: "secret".to_string(),
        }
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let client = GoTrueClient::new(&config("https://project.supabase.co/"));
        assert_eq!(
            client.url("/admin/users"),
            "https://project.supabase.co/auth/v1/admin/users"
        );
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!("{:?}", GoTrueClient::new(&config("https://x.supabase.co")));
        assert!(!rendered.contains("service"));
        assert!(rendered.contains("x.supabase.co"));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_external_error() {
        let client = GoTrueClient::new(&config("http://127.0.0.1:9"));
        let err = client
            .sign_in_with_password("a@svninvest.com.br", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalService(_)));
    }
}
