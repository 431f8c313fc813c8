//! Client book listing.

use assessoria_core::revenue::ClientPosition;
use assessoria_db::ClientRepository;
use assessoria_shared::types::{PageRequest, PageResponse};
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the clients router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/clients", get(list_clients))
}

/// GET /clients?page&per_page
async fn list_clients(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<ClientPosition>>> {
    let rls = state.begin(user.claims()).await?;
    let clients = ClientRepository::new(rls.transaction())
        .list_page(user.advisor_id(), &page)
        .await?;
    rls.commit().await?;
    Ok(Json(clients))
}
