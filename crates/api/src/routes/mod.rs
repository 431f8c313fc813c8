//! API route definitions.

use assessoria_shared::{AppError, YearMonth};
use axum::{Router, middleware};
use chrono::Utc;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod bonuses;
pub mod clients;
pub mod cross_sell;
pub mod goals;
pub mod health;
pub mod insights;
pub mod me;
pub mod monitoring;
pub mod revenue;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(me::routes())
        .merge(clients::routes())
        .merge(cross_sell::routes())
        .merge(goals::routes())
        .merge(bonuses::routes())
        .merge(revenue::routes())
        .merge(insights::routes())
        .merge(monitoring::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Parses a `YYYY-MM` path or query value.
pub(crate) fn parse_month(value: &str) -> Result<YearMonth, AppError> {
    value
        .parse()
        .map_err(|e: assessoria_shared::types::MonthParseError| AppError::Validation(e.to_string()))
}

/// The month `month` names, or the current one.
pub(crate) fn month_or_current(month: Option<&str>) -> Result<YearMonth, AppError> {
    month.map_or_else(|| Ok(current_month()), parse_month)
}

/// Current calendar month in UTC.
pub(crate) fn current_month() -> YearMonth {
    YearMonth::from_date(Utc::now().date_naive())
}

/// Shared fixtures for route tests.
#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use assessoria_core::monitoring::AlertLog;
    use assessoria_shared::config::{AuthConfig, ReconciliationConfig, SupabaseConfig};
    use assessoria_shared::{Claims, JwtConfig, JwtService};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, header::AUTHORIZATION};
    use axum::response::Response;
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use tokio::sync::RwLock;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::AppState;
    use crate::supabase::GoTrueClient;

    pub const SECRET: &str = "route-test-secret-long-enough";

    /// State without a database; handlers that reach it fail with 500.
    pub fn state() -> AppState {
        let supabase = SupabaseConfig {
            url: "http://127.0.0.1:9".to_string(),
            anon_key: "anon".to_string(),
            service_role_key: "service".to_string(),
            jwt_secret: SECRET.to_string(),
        };
        AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            jwt_service: Arc::new(JwtService::new(JwtConfig {
                secret: SECRET.to_string(),
                access_token_expires_minutes: 5,
            })),
            identity: Arc::new(GoTrueClient::new(&supabase)),
            auth: Arc::new(AuthConfig::default()),
            reconciliation: Arc::new(ReconciliationConfig::default()),
            alerts: Arc::new(RwLock::new(AlertLog::default())),
            monitoring_active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn app() -> Router {
        crate::create_router(state())
    }

    pub fn token_for(email: &str) -> String {
        let claims = Claims::new(Uuid::new_v4(), email, Utc::now() + Duration::minutes(5));
        state().jwt_service.encode_claims(&claims).unwrap()
    }

    pub fn authed(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", token_for("advisor@svninvest.com.br")),
            )
            .header("content-type", "application/json");
        match body {
            Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.unwrap()
    }

    pub async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    }
}
