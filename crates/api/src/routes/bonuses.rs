//! Bonus mission routes.

use assessoria_core::bonus::{BonusMission, BonusSummary, CreateMissionInput, UpdateMissionInput};
use assessoria_db::BonusRepository;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};

use super::month_or_current;
use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the bonuses router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bonuses", get(list_missions).post(create_mission))
        .route("/bonuses/summary", get(summary))
        .route(
            "/bonuses/{id}",
            patch(update_mission).delete(delete_mission),
        )
}

/// Month selector; defaults to the current month.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// `YYYY-MM`.
    pub month: Option<String>,
}

/// Missions of a month with their payout summary.
#[derive(Debug, Serialize)]
pub struct MissionsResponse {
    /// Missions in creation order.
    pub missions: Vec<BonusMission>,
    /// Totals over the active missions.
    pub summary: BonusSummary,
}

/// GET /bonuses?month=
async fn list_missions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<MissionsResponse>> {
    let month = month_or_current(query.month.as_deref())?;

    let rls = state.begin(user.claims()).await?;
    let missions = BonusRepository::new(rls.transaction())
        .list_by_month(user.advisor_id(), month)
        .await?;
    rls.commit().await?;

    let summary = BonusSummary::from_missions(&missions);
    Ok(Json(MissionsResponse { missions, summary }))
}

/// GET /bonuses/summary?month=
async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<BonusSummary>> {
    let month = month_or_current(query.month.as_deref())?;

    let rls = state.begin(user.claims()).await?;
    let missions = BonusRepository::new(rls.transaction())
        .list_by_month(user.advisor_id(), month)
        .await?;
    rls.commit().await?;

    Ok(Json(BonusSummary::from_missions(&missions)))
}

/// POST /bonuses
async fn create_mission(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMissionInput>,
) -> ApiResult<(StatusCode, Json<BonusMission>)> {
    let rls = state.begin(user.claims()).await?;
    let mission = BonusRepository::new(rls.transaction())
        .create(user.advisor_id(), payload)
        .await?;
    rls.commit().await?;

    tracing::info!(
        user_id = %user.advisor_id(),
        mission_id = mission.id,
        month = %mission.month,
        "bonus mission created"
    );
    Ok((StatusCode::CREATED, Json(mission)))
}

/// PATCH /bonuses/{id}
async fn update_mission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMissionInput>,
) -> ApiResult<Json<BonusMission>> {
    let rls = state.begin(user.claims()).await?;
    let mission = BonusRepository::new(rls.transaction())
        .update(user.advisor_id(), id, payload)
        .await?;
    rls.commit().await?;
    Ok(Json(mission))
}

/// DELETE /bonuses/{id}
async fn delete_mission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let rls = state.begin(user.claims()).await?;
    BonusRepository::new(rls.transaction())
        .delete(user.advisor_id(), id)
        .await?;
    rls.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
