//! Client book insights.

use std::collections::{BTreeMap, HashMap};

use assessoria_core::insights::{ClientSnapshot, Insight, QuadrantThresholds, evaluate_book};
use assessoria_core::revenue::{ClientPosition, extract_code_digits};
use assessoria_db::{ClientRepository, CrossSellRepository, RevenueRepository};
use assessoria_shared::YearMonth;
use axum::{Json, Router, extract::State, routing::get};
use rust_decimal::Decimal;
use serde::Serialize;

use super::current_month;
use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the insights router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/insights", get(list_insights))
}

/// Insights over the whole book.
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    /// Last month included in year-to-date revenue.
    pub through: YearMonth,
    /// Median revenue and NET splitting the quadrants.
    pub thresholds: QuadrantThresholds,
    /// Fired rules, most severe first.
    pub insights: Vec<Insight>,
}

/// Year-to-date revenue of a client across both of its account codes.
fn client_revenue(client: &ClientPosition, by_code: &BTreeMap<String, Decimal>) -> Decimal {
    let mut codes: Vec<String> = [client.code_xp.as_deref(), client.code_mb.as_deref()]
        .into_iter()
        .flatten()
        .map(extract_code_digits)
        .filter(|code| !code.is_empty())
        .collect();
    codes.dedup();

    codes
        .iter()
        .filter_map(|code| by_code.get(code))
        .copied()
        .sum()
}

/// GET /insights
async fn list_insights(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<InsightsResponse>> {
    let user_id = user.advisor_id();
    let through = current_month();

    let rls = state.begin(user.claims()).await?;
    let conn = rls.transaction();
    let clients = ClientRepository::new(conn).list_positions(user_id).await?;
    let statuses: HashMap<_, _> = CrossSellRepository::new(conn)
        .list(user_id)
        .await?
        .into_iter()
        .map(|record| (record.client_id, record.status))
        .collect();
    let by_code = RevenueRepository::new(conn)
        .revenue_by_client_until(user_id, through, state.pagination())
        .await?;
    rls.commit().await?;

    let snapshots: Vec<ClientSnapshot> = clients
        .iter()
        .map(|client| ClientSnapshot {
            client_id: client.id,
            name: client.name.clone(),
            model: client.model,
            net_total: client.net_total,
            ytd_revenue: client_revenue(client, &by_code),
            cross_sell: statuses.get(&client.id).copied().unwrap_or_default(),
        })
        .collect();

    let (thresholds, insights) = evaluate_book(&snapshots);
    Ok(Json(InsightsResponse {
        through,
        thresholds,
        insights,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assessoria_core::revenue::ClientModel;
    use assessoria_shared::ClientId;
    use rust_decimal_macros::dec;

    fn client(code_xp: Option<&str>, code_mb: Option<&str>) -> ClientPosition {
        ClientPosition {
            id: ClientId::new(),
            name: "Cliente".to_string(),
            code_xp: code_xp.map(str::to_string),
            code_mb: code_mb.map(str::to_string),
            model: ClientModel::default(),
            pass_through: dec!(50),
            net_total: dec!(100000),
        }
    }

    #[test]
    fn test_client_revenue_sums_both_codes() {
        let by_code = BTreeMap::from([
            ("123".to_string(), dec!(10.50)),
            ("456".to_string(), dec!(4.50)),
        ]);
        assert_eq!(
            client_revenue(&client(Some("XP-123"), Some("MB 456")), &by_code),
            dec!(15.00)
        );
    }

    #[test]
    fn test_client_revenue_counts_shared_code_once() {
        let by_code = BTreeMap::from([("123".to_string(), dec!(10))]);
        assert_eq!(
            client_revenue(&client(Some("123"), Some("A123")), &by_code),
            dec!(10)
        );
    }

    #[test]
    fn test_client_without_codes_has_no_revenue() {
        let by_code = BTreeMap::from([(String::new(), dec!(99))]);
        assert_eq!(client_revenue(&client(None, Some("--")), &by_code), Decimal::ZERO);
    }
}
