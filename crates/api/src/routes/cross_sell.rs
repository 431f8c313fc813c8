//! Cross-sell status routes.
//!
//! Statuses are edited per client through a sparse map of column name to
//! value, matching how the dashboard grid submits single-cell changes.

use std::collections::BTreeMap;

use assessoria_core::cross_sell::{AdoptionSummary, CrossSellStatus};
use assessoria_db::{ClientCrossSell, ClientRepository, CrossSellRepository};
use assessoria_shared::{AppError, ClientId};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the cross-sell router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cross-sell", get(list_statuses))
        .route("/cross-sell/summary", get(summary))
        .route(
            "/cross-sell/{client_id}",
            put(update_status).delete(delete_status),
        )
}

/// GET /cross-sell
async fn list_statuses(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ClientCrossSell>>> {
    let rls = state.begin(user.claims()).await?;
    let statuses = CrossSellRepository::new(rls.transaction())
        .list(user.advisor_id())
        .await?;
    rls.commit().await?;
    Ok(Json(statuses))
}

/// GET /cross-sell/summary
async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<AdoptionSummary>> {
    let rls = state.begin(user.claims()).await?;
    let conn = rls.transaction();
    let records = CrossSellRepository::new(conn)
        .list(user.advisor_id())
        .await?;
    let clients = ClientRepository::new(conn)
        .list_positions(user.advisor_id())
        .await?;
    rls.commit().await?;

    let statuses: Vec<CrossSellStatus> = records.into_iter().map(|r| r.status).collect();
    let total = u64::try_from(clients.len()).unwrap_or(u64::MAX);
    Ok(Json(AdoptionSummary::from_records(&statuses, total)))
}

/// PUT /cross-sell/{client_id}
async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<Uuid>,
    Json(updates): Json<BTreeMap<String, String>>,
) -> ApiResult<Json<ClientCrossSell>> {
    if updates.is_empty() {
        return Err(AppError::Validation("no product status given".to_string()).into());
    }
    let client_id = ClientId::from_uuid(client_id);

    let rls = state.begin(user.claims()).await?;
    let status = CrossSellRepository::new(rls.transaction())
        .apply_updates(user.advisor_id(), client_id, &updates)
        .await?;
    rls.commit().await?;

    tracing::info!(
        user_id = %user.advisor_id(),
        client_id = %client_id,
        columns = updates.len(),
        "cross-sell updated"
    );
    Ok(Json(ClientCrossSell { client_id, status }))
}

/// DELETE /cross-sell/{client_id}
async fn delete_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let rls = state.begin(user.claims()).await?;
    CrossSellRepository::new(rls.transaction())
        .delete(user.advisor_id(), ClientId::from_uuid(client_id))
        .await?;
    rls.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use crate::routes::test_support::{app, authed, send};

    #[tokio::test]
    async fn test_empty_update_rejected() {
        let uri = format!("/api/v1/cross-sell/{}", Uuid::new_v4());
        let response = send(app(), authed("PUT", &uri, Some(json!({})))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_client_id_rejected() {
        let response = send(
            app(),
            authed("PUT", "/api/v1/cross-sell/not-a-uuid", Some(json!({ "mb": "Booked" }))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
