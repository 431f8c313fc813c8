//! Reconciliation monitoring: health and alert history.

use assessoria_core::monitoring::{Alert, HealthReport, Severity};
use assessoria_shared::AppError;
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Largest page of alerts returned at once.
const MAX_ALERTS: usize = 500;

/// Creates the monitoring router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/monitoring/health", get(health))
        .route("/monitoring/alerts", get(alerts))
}

/// Alert filters.
#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    /// `INFO`, `WARNING`, `ERROR` or `CRITICAL`.
    pub severity: Option<String>,
    /// Raising component, e.g. `revenue_check`.
    pub component: Option<String>,
    /// Maximum alerts returned.
    pub limit: Option<usize>,
}

fn parse_severity(value: &str) -> Result<Severity, AppError> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_uppercase()))
        .map_err(|_| AppError::Validation(format!("unknown severity '{value}'")))
}

/// GET /monitoring/health
async fn health(State(state): State<AppState>, _user: AuthUser) -> Json<HealthReport> {
    let log = state.alerts.read().await;
    Json(HealthReport::build(&log, Utc::now(), state.is_monitoring()))
}

/// GET /monitoring/alerts?severity&component&limit
///
/// Only the caller's alerts and system-wide ones are visible.
async fn alerts(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AlertsQuery>,
) -> ApiResult<Json<Vec<Alert>>> {
    let severity = query.severity.as_deref().map(parse_severity).transpose()?;
    let limit = query.limit.unwrap_or(100).clamp(1, MAX_ALERTS);
    let user_id = user.advisor_id();

    let log = state.alerts.read().await;
    let visible = log
        .query(severity, query.component.as_deref(), usize::MAX)
        .into_iter()
        .filter(|alert| alert.user_id.is_none_or(|owner| owner == user_id))
        .take(limit)
        .collect();
    Ok(Json(visible))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assessoria_core::monitoring::{COMPONENT_MONITOR, COMPONENT_REVENUE_CHECK};
    use assessoria_shared::AdvisorId;
    use axum::http::StatusCode;

    use crate::routes::test_support::{authed, json_body, send, state};

    #[test]
    fn test_parse_severity_is_case_insensitive() {
        assert_eq!(parse_severity("critical").unwrap(), Severity::Critical);
        assert_eq!(parse_severity("WARNING").unwrap(), Severity::Warning);
        assert!(parse_severity("loud").is_err());
    }

    #[tokio::test]
    async fn test_alerts_hide_other_advisors() {
        let state = state();
        {
            let mut log = state.alerts.write().await;
            log.push(Alert::new(Severity::Info, COMPONENT_MONITOR, "system"));
            log.push(
                Alert::new(Severity::Error, COMPONENT_REVENUE_CHECK, "someone else")
                    .for_user(AdvisorId::new()),
            );
        }

        let response = send(
            crate::create_router(state),
            authed("GET", "/api/v1/monitoring/alerts", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let alerts = body.as_array().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0]["message"], "system");
    }

    #[tokio::test]
    async fn test_health_without_alerts() {
        let response = send(
            crate::create_router(state()),
            authed("GET", "/api/v1/monitoring/health", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["monitoring_active"], false);
        assert_eq!(body["total_alerts"], 0);
    }
}
