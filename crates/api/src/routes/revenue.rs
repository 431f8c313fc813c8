//! Revenue routes: yearly series, advisor revenue and reconciliation.
//!
//! Each read that paginates also cross-checks against a direct aggregate.
//! Failed checks are pushed to the alert log so they show up in the
//! monitoring endpoints even when nobody is watching the response.

use std::str::FromStr;

use assessoria_core::bonus::monthly_payable_total;
use assessoria_core::monitoring::{Alert, AlertLog};
use assessoria_core::reconciliation::ReconciliationReport;
use assessoria_core::revenue::{AdvisorRevenue, advisor_revenue};
use assessoria_db::{
    BonusRepository, ClientRepository, RevenueRepository, RevenueSeries, ensure_consistent,
};
use assessoria_shared::{AppError, YearMonth};
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::month_or_current;
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::monitor::record_alert;

/// Years the series endpoint accepts.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 2000..=2100;

/// Creates the revenue router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/revenue", get(yearly_series))
        .route("/revenue/advisor", get(advisor))
        .route("/revenue/reconciliation", get(reconciliation))
}

/// Query for the yearly series.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    /// Calendar year; defaults to the current one.
    pub year: Option<i32>,
}

/// Month selector; defaults to the current month.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// `YYYY-MM`.
    pub month: Option<String>,
}

/// Query for an explicit reconciliation.
#[derive(Debug, Deserialize)]
pub struct ReconciliationQuery {
    /// `YYYY-MM`; defaults to the current month.
    pub month: Option<String>,
    /// Total the caller expects, e.g. from the custody statement.
    pub expected: Option<String>,
    /// Fail the request when the check does not pass.
    #[serde(default)]
    pub strict: bool,
}

/// Advisor revenue of one month.
#[derive(Debug, Serialize)]
pub struct AdvisorRevenueResponse {
    /// Month.
    pub month: YearMonth,
    /// Breakdown.
    #[serde(flatten)]
    pub revenue: AdvisorRevenue,
}

/// GET /revenue?year=
async fn yearly_series(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<RevenueSeries>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    if !YEAR_RANGE.contains(&year) {
        return Err(AppError::Validation(format!("year {year} is out of range")).into());
    }

    let rls = state.begin(user.claims()).await?;
    let series = RevenueRepository::new(rls.transaction())
        .yearly_series(
            user.advisor_id(),
            year,
            state.reconciliation.tolerance,
            state.pagination(),
        )
        .await?;
    rls.commit().await?;

    for report in series.checks.iter().filter(|r| !r.passed()) {
        record_alert(&state.alerts, Alert::from_report(user.advisor_id(), report)).await;
    }

    Ok(Json(series))
}

/// GET /revenue/advisor?month=
async fn advisor(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<AdvisorRevenueResponse>> {
    let month = month_or_current(query.month.as_deref())?;
    let user_id = user.advisor_id();

    let rls = state.begin(user.claims()).await?;
    let conn = rls.transaction();
    let office = RevenueRepository::new(conn)
        .office_revenue(user_id, month)
        .await?;
    let clients = ClientRepository::new(conn).list_positions(user_id).await?;
    let missions = BonusRepository::new(conn)
        .list_by_month(user_id, month)
        .await?;
    rls.commit().await?;

    let revenue = advisor_revenue(office, &clients, monthly_payable_total(&missions));
    Ok(Json(AdvisorRevenueResponse { month, revenue }))
}

/// GET /revenue/reconciliation?month&expected&strict
async fn reconciliation(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReconciliationQuery>,
) -> ApiResult<Json<ReconciliationReport>> {
    let month = month_or_current(query.month.as_deref())?;
    let expected = query
        .expected
        .as_deref()
        .map(|raw| {
            Decimal::from_str(raw.trim())
                .map_err(|_| AppError::Validation(format!("invalid expected total '{raw}'")))
        })
        .transpose()?;
    let user_id = user.advisor_id();

    let rls = state.begin(user.claims()).await?;
    let outcome = RevenueRepository::new(rls.transaction())
        .reconcile_month(
            user_id,
            month,
            expected,
            state.reconciliation.tolerance,
            state.pagination(),
        )
        .await;

    let report = match outcome {
        Ok(report) => {
            rls.commit().await?;
            report
        }
        Err(e) => {
            let alert = Alert::check_failed(user_id, &month.to_string(), &e.to_string());
            return Err(failed_check(&state.alerts, alert, rls.rollback(), e).await);
        }
    };

    record_alert(&state.alerts, Alert::from_report(user_id, &report)).await;
    if query.strict {
        ensure_consistent(&report)?;
    }
    Ok(Json(report))
}

/// Records `alert` for a check that errored, then rolls back.
///
/// The alert is kept even when the rollback fails; the caller gets the
/// original error either way.
async fn failed_check<F>(
    alerts: &RwLock<AlertLog>,
    alert: Alert,
    rollback: F,
    err: AppError,
) -> ApiError
where
    F: Future<Output = Result<(), DbErr>>,
{
    record_alert(alerts, alert).await;
    if let Err(rollback_err) = rollback.await {
        tracing::error!(error = %rollback_err, "rollback after failed check failed");
    }
    ApiError(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assessoria_core::monitoring::Severity;
    use assessoria_shared::AdvisorId;
    use axum::http::StatusCode;
    use rstest::rstest;

    use crate::routes::test_support::{app, authed, json_body, send};

    #[tokio::test]
    async fn test_failed_check_alert_survives_rollback_error() {
        let alerts = RwLock::new(AlertLog::default());
        let user = AdvisorId::new();
        let alert = Alert::check_failed(user, "2025-02", "page limit reached");

        let err = failed_check(
            &alerts,
            alert,
            async { Err(DbErr::Custom("connection closed".to_string())) },
            AppError::DataIntegrity("page limit reached".to_string()),
        )
        .await;

        assert!(matches!(err.0, AppError::DataIntegrity(_)));
        let log = alerts.read().await;
        let recorded = log.query(Some(Severity::Critical), None, 10);
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].user_id, Some(user));
    }

    #[rstest]
    #[case("/api/v1/revenue?year=1999")]
    #[case("/api/v1/revenue/advisor?month=2025-13")]
    #[case("/api/v1/revenue/reconciliation?month=2025-02&expected=abc")]
    #[tokio::test]
    async fn test_bad_parameters_rejected(#[case] uri: &str) {
        let response = send(app(), authed("GET", uri, None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_database_failure_is_opaque() {
        let response = send(
            app(),
            authed("GET", "/api/v1/revenue/reconciliation?month=2025-02", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["message"], "An internal error occurred");
    }
}
