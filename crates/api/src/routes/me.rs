//! Profile of the signed-in advisor.

use assessoria_db::entities::profiles;
use assessoria_db::{ProfileRepository, UpdateProfileInput};
use axum::{Json, Router, extract::State, routing::get};

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the profile router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(get_profile).patch(update_profile))
}

/// GET /me
async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<profiles::Model>> {
    let rls = state.begin(user.claims()).await?;
    let profile = ProfileRepository::new(rls.transaction())
        .get(user.advisor_id())
        .await?;
    rls.commit().await?;
    Ok(Json(profile))
}

/// PATCH /me
async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileInput>,
) -> ApiResult<Json<profiles::Model>> {
    let payload = payload.validate()?;

    let rls = state.begin(user.claims()).await?;
    let profile = ProfileRepository::new(rls.transaction())
        .update(user.advisor_id(), payload)
        .await?;
    rls.commit().await?;

    tracing::info!(user_id = %user.advisor_id(), "profile updated");
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app, authed, send};

    #[tokio::test]
    async fn test_blank_name_rejected_before_database() {
        let response = send(app(), authed("PATCH", "/api/v1/me", Some(json!({ "nome": "  " })))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
