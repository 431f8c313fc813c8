//! Monthly goal routes.

use assessoria_core::goals::{GoalProgress, MonthlyGoal};
use assessoria_db::{GoalRepository, RevenueRepository};
use assessoria_shared::YearMonth;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{current_month, parse_month};
use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the goals router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals))
        .route("/goals/{month}", put(set_goal))
        .route("/goals/{month}/progress", get(goal_progress))
}

/// Query for the goal list.
#[derive(Debug, Deserialize)]
pub struct GoalsQuery {
    /// Restricts the list to one `YYYY-MM` month.
    pub month: Option<String>,
}

/// Body of a goal update.
#[derive(Debug, Deserialize)]
pub struct SetGoalRequest {
    /// Revenue target in BRL.
    pub target: Decimal,
}

/// Progress of one month against its goal.
#[derive(Debug, Serialize)]
pub struct GoalProgressResponse {
    /// Month.
    pub month: YearMonth,
    /// Whether a goal was set for the month.
    pub has_goal: bool,
    /// Progress figures.
    #[serde(flatten)]
    pub progress: GoalProgress,
}

/// GET /goals?month=
async fn list_goals(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<GoalsQuery>,
) -> ApiResult<Json<Vec<MonthlyGoal>>> {
    let month = query.month.as_deref().map(parse_month).transpose()?;

    let rls = state.begin(user.claims()).await?;
    let goals = GoalRepository::new(rls.transaction())
        .list(user.advisor_id(), month)
        .await?;
    rls.commit().await?;
    Ok(Json(goals))
}

/// PUT /goals/{month}
async fn set_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(month): Path<String>,
    Json(payload): Json<SetGoalRequest>,
) -> ApiResult<Json<MonthlyGoal>> {
    let month = parse_month(&month)?;

    let rls = state.begin(user.claims()).await?;
    let goal = GoalRepository::new(rls.transaction())
        .upsert(user.advisor_id(), month, payload.target)
        .await?;
    rls.commit().await?;

    tracing::info!(user_id = %user.advisor_id(), month = %month, target = %goal.target, "goal set");
    Ok(Json(goal))
}

/// GET /goals/{month}/progress
///
/// The current month also reports whether the advisor is on pace for the
/// elapsed share of the month.
async fn goal_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(month): Path<String>,
) -> ApiResult<Json<GoalProgressResponse>> {
    let month = parse_month(&month)?;

    let rls = state.begin(user.claims()).await?;
    let conn = rls.transaction();
    let goal = GoalRepository::new(conn).get(user.advisor_id(), month).await?;
    let achieved = RevenueRepository::new(conn)
        .office_revenue(user.advisor_id(), month)
        .await?;
    rls.commit().await?;

    let target = goal.as_ref().map_or(Decimal::ZERO, |g| g.target);
    let progress = if month == current_month() {
        GoalProgress::compute_at(target, achieved, Utc::now().day(), month.days_in_month())
    } else {
        GoalProgress::compute(target, achieved)
    };

    Ok(Json(GoalProgressResponse {
        month,
        has_goal: goal.is_some(),
        progress,
    }))
}
